//! Default event handler.
//!
//! Logs every event, drains completed lines, and forwards gesture and
//! orientation notices to the broker bridge.  Everything here runs
//! inside the control loop and must stay short.

use crate::board::link::SerialLink;
use defmt::{info, warn};
use snapsense::{EventCode, EventHandler, Link, Orientation};

pub struct AppHandler {
    terminal: &'static SerialLink,
    broker: &'static SerialLink,
}

impl AppHandler {
    pub fn new(terminal: &'static SerialLink, broker: &'static SerialLink) -> Self {
        Self { terminal, broker }
    }

    fn link(&self, link: Link) -> &'static SerialLink {
        match link {
            Link::Terminal => self.terminal,
            Link::Broker => self.broker,
        }
    }
}

impl EventHandler for AppHandler {
    fn handle(&mut self, event: EventCode) {
        info!("Dispatch: {}", event);

        if let EventCode::MessageReady(link) = event {
            if let Some(line) = self.link(link).take_line() {
                info!("{} <- {=[u8]:a}", link, line.as_slice());
            }
            return;
        }

        if let Some(notice) = broker_notice(event) {
            if let Err(e) = self.broker.send(notice) {
                warn!("Broker notice dropped: {}", e);
            }
        }
    }
}

fn broker_notice(event: EventCode) -> Option<&'static [u8]> {
    let notice: &'static [u8] = match event {
        EventCode::SnapSingle => b"SNAP 1\r\n",
        EventCode::SnapDouble => b"SNAP 2\r\n",
        EventCode::OrientationChanged(Orientation::Vertical) => b"ORIENT V\r\n",
        EventCode::OrientationChanged(Orientation::Lateral) => b"ORIENT L\r\n",
        EventCode::OrientationChanged(Orientation::Horizontal) => b"ORIENT H\r\n",
        EventCode::MessageReady(_) => return None,
    };
    Some(notice)
}
