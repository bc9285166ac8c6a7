//! Email and URL checks

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use super::Check;
use crate::value;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

fn is_email(address: &str) -> bool {
    let Some((local, _)) = address.rsplit_once('@') else {
        return false;
    };
    EMAIL.is_match(address)
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}

pub(super) fn check_email(value: &Value) -> Check {
    let address = value::display(value);
    if is_email(&address) {
        Check::Pass
    } else {
        Check::Message(format!("Invalid email address: {address}"))
    }
}

pub(super) fn check_url(value: &Value) -> Check {
    let text = value::display(value);
    let has_host = Url::parse(&text)
        .ok()
        .and_then(|url| url.host_str().map(|host| !host.is_empty()))
        .unwrap_or(false);
    if has_host {
        Check::Pass
    } else {
        Check::Message(format!("Invalid URL: {text}"))
    }
}
