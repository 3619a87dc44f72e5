use colored::*;
use riskmap_common::catalog::PortCatalog;
use riskmap_core::features::FeatureVector;
use riskmap_core::scanner::OpenPort;
use riskmap_core::scorer::{ThreatClass, Verdict};

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn open_port_details(open_ports: &[OpenPort], catalog: &PortCatalog) -> Vec<Detail> {
    open_ports
        .iter()
        .map(|open| {
            let key: String = format!("{}/tcp", open.port);
            let value: ColoredString = if catalog.is_risky(open.port) {
                format!("{} {}", open.label, "(risky)".color(colors::RISKY)).normal()
            } else {
                open.label.color(colors::TEXT_DEFAULT)
            };
            (key, value)
        })
        .collect()
}

pub fn verdict_label(verdict: &Verdict) -> ColoredString {
    match verdict.class {
        ThreatClass::Safe => "SAFE".bold().color(colors::SAFE),
        ThreatClass::Threat => "THREAT".bold().color(colors::THREAT),
    }
}

pub fn feature_summary(features: &FeatureVector) -> String {
    format!(
        "{} open, {} risky, os code {}",
        features.total, features.risky, features.os_code
    )
}
