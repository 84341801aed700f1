//! Terminal front end: shows the access point as text and a QR symbol, and
//! turns keyboard input into control events.

use crate::server::{AccessPoint, ControlEvent};
use anyhow::{Context, Result};
use qrcode::{render::unicode, QrCode};
use std::io::BufRead;
use tokio::sync::{mpsc, watch};

pub fn generate_qr(url: &str) -> Result<String> {
    let code = QrCode::new(url.as_bytes()).context("Failed to generate QR code")?;

    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Block printed after every (re)start.
pub fn render_access_point(access_point: &AccessPoint, show_qr: bool) -> Result<String> {
    let mut out = String::new();
    if show_qr {
        out.push_str(&generate_qr(&access_point.uri)?);
        out.push('\n');
    }
    out.push_str(&format!(
        "Sharing on {}: {}\n",
        access_point.interface_name, access_point.uri
    ));
    out.push_str("[Enter] next interface   [q] quit\n");
    Ok(out)
}

/// `""`/`n`/`next` switch, `q`/`quit` quit, anything else is ignored.
pub fn parse_command(line: &str) -> Option<ControlEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "n" | "next" => Some(ControlEvent::SwitchInterface),
        "q" | "quit" | "exit" => Some(ControlEvent::Shutdown),
        _ => None,
    }
}

/// Reads stdin on a plain thread so a pending read never holds up exit.
pub fn spawn_input(events: mpsc::Sender<ControlEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(event) = parse_command(&line) else {
                continue;
            };
            if events.blocking_send(event).is_err() || event == ControlEvent::Shutdown {
                break;
            }
        }
    });
}

/// Prints each new access point until the control loop drops its sender.
pub async fn display(mut updates: watch::Receiver<Option<AccessPoint>>, show_qr: bool) {
    loop {
        let current = updates.borrow_and_update().clone();
        if let Some(access_point) = current {
            match render_access_point(&access_point, show_qr) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    tracing::warn!("{:#}", e);
                    println!("{}", access_point.uri);
                }
            }
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse_command(""), Some(ControlEvent::SwitchInterface));
        assert_eq!(parse_command(" n "), Some(ControlEvent::SwitchInterface));
        assert_eq!(parse_command("Q"), Some(ControlEvent::Shutdown));
        assert_eq!(parse_command("hello"), None);
    }

    #[test]
    fn render_includes_interface_and_uri() {
        let access_point = AccessPoint {
            interface_name: "wlan0".to_string(),
            uri: "http://192.168.1.4:40000/".to_string(),
        };
        let text = render_access_point(&access_point, false).expect("render");
        assert!(text.contains("wlan0"));
        assert!(text.contains("http://192.168.1.4:40000/"));

        let with_qr = render_access_point(&access_point, true).expect("render");
        assert!(with_qr.lines().count() > text.lines().count());
    }
}
