// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// A submission a human would send.
pub fn human_submission(i: usize) -> String {
    json!({
        "name": format!("Visitor {i}"),
        "company": format!("Company {}", i % 7),
        "email": format!("visitor{i}@company{}.example.com", i % 7),
        "topic": "Sales",
        "message": format!("Interested in a demo, request {i}"),
        "honeypot": "",
    })
    .to_string()
}

/// A submission from a form-filling bot: every field set, honeypot included.
pub fn bot_submission(i: usize) -> String {
    json!({
        "name": format!("Bot {i}"),
        "company": "Cheap Pills Ltd",
        "email": format!("bot{i}@spam.example"),
        "phone": "+1 555 0100",
        "topic": "Partnership",
        "message": "Visit http://spam.example for deals",
        "honeypot": format!("http://spam.example/{i}"),
    })
    .to_string()
}

/// Submissions that break one required-field rule each.
pub fn invalid_field_submissions() -> Vec<String> {
    vec![
        json!({"company": "Acme", "email": "jane@acme.com", "message": "hi"}).to_string(),
        json!({"name": "Jane", "email": "jane@acme.com", "message": "hi"}).to_string(),
        json!({"name": "Jane", "company": "Acme", "message": "hi"}).to_string(),
        json!({"name": "Jane", "company": "Acme", "email": "jane@acme.com"}).to_string(),
        json!({"name": "Jane", "company": "Acme", "email": "jane.acme.com", "message": "hi"}).to_string(),
        json!({"name": "Jane", "company": "Acme", "email": "jane@", "message": "hi"}).to_string(),
        json!({"name": "Jane", "company": "Acme", "email": "@acme.com", "message": "hi"}).to_string(),
        json!({"name": " ", "company": "\t", "email": "jane@acme.com", "message": "hi"}).to_string(),
        json!({"name": "Jane", "company": "Acme", "email": "jane@acme.com", "message": "x".repeat(5001)}).to_string(),
    ]
}

/// Bodies that cannot be decoded as a submission.
pub fn malformed_bodies() -> Vec<&'static str> {
    vec![
        "",
        "   ",
        "not json",
        "{",
        "name=Jane&company=Acme",
        r#"{"name": 42}"#,
        r#"{"topic": "Lottery"}"#,
        r#"{"name": null}"#,
        "[1, 2, 3]",
        "[]",
        "null",
        r#""Jane""#,
    ]
}

/// Markup injection attempts placed in the message field.
pub fn injection_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<img src=x onerror=alert(1)>",
        "\"><svg/onload=alert('x')>",
        "<a href='javascript:alert(1)'>click</a>",
        "</p><iframe src=//evil.example></iframe><p>",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_clients() {
        let clients = generate_clients(256);
        assert_eq!(clients.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = clients.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_bot_submission_has_honeypot() {
        let value: serde_json::Value = serde_json::from_str(&bot_submission(3)).unwrap();
        assert_eq!(value["honeypot"], "http://spam.example/3");
    }
}
