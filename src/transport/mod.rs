pub mod advertise;
pub mod interfaces;
pub mod local;

pub use advertise::{Advertiser, MdnsAdvertiser, NoopAdvertiser, ServiceRecord};
pub use interfaces::{initial_index, list_interfaces, NetworkInterface};
