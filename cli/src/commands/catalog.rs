use colored::*;
use riskmap_common::catalog::PortCatalog;

use crate::terminal::{colors, print};

pub fn catalog(q_level: u8) {
    let catalog = PortCatalog::well_known();
    print::header("port catalog", q_level);

    let key_width: usize = catalog
        .iter()
        .map(|entry| entry.port.to_string().len())
        .max()
        .unwrap_or(0);

    for entry in catalog.iter() {
        let value: ColoredString = if entry.risky {
            format!("{} {}", entry.label, "(risky)".color(colors::RISKY)).normal()
        } else {
            entry.label.color(colors::TEXT_DEFAULT)
        };
        print::aligned_line(&entry.port.to_string(), value, key_width);
    }

    let risky: usize = catalog.risky_ports().count();
    print::status(&format!("{} ports, {} flagged risky", catalog.len(), risky));
}
