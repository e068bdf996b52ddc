use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"mobile"));
static TABLET_RE: LazyLock<Regex> = LazyLock::new(|| re(r"tablet"));
static DESKTOP_RE: LazyLock<Regex> = LazyLock::new(|| re(r"windows|macintosh|linux"));
static CHROME_RE: LazyLock<Regex> = LazyLock::new(|| re(r"chrome"));
static FIREFOX_RE: LazyLock<Regex> = LazyLock::new(|| re(r"firefox"));
static SAFARI_RE: LazyLock<Regex> = LazyLock::new(|| re(r"safari"));
static EDGE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"edge"));
static OPERA_RE: LazyLock<Regex> = LazyLock::new(|| re(r"opera|opr"));

fn re(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("valid user-agent regex")
}

/// Device metadata attached to a session at login and carried forward
/// through refresh-token rotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_name: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub ip_address: Option<String>,
}

impl DeviceInfo {
    /// Classify a User-Agent string into a coarse device type and browser
    /// family. Pattern order matters: Chrome-based agents advertise Safari
    /// too, so Chrome is checked first.
    pub fn from_user_agent(user_agent: &str, ip_address: Option<String>) -> Self {
        let device_type = if MOBILE_RE.is_match(user_agent) {
            "mobile"
        } else if TABLET_RE.is_match(user_agent) {
            "tablet"
        } else if DESKTOP_RE.is_match(user_agent) {
            "desktop"
        } else {
            "unknown"
        };

        let browser = if CHROME_RE.is_match(user_agent) {
            "Chrome"
        } else if FIREFOX_RE.is_match(user_agent) {
            "Firefox"
        } else if SAFARI_RE.is_match(user_agent) {
            "Safari"
        } else if EDGE_RE.is_match(user_agent) {
            "Edge"
        } else if OPERA_RE.is_match(user_agent) {
            "Opera"
        } else {
            "unknown"
        };

        Self {
            device_name: Some(format!("{device_type} - {browser}")),
            device_type: Some(device_type.to_owned()),
            browser: Some(browser.to_owned()),
            ip_address,
        }
    }
}
