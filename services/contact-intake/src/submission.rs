// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission payload and its email rendering.

use serde::de::Error as _;
use serde::Deserialize;

/// Topic picked from the contact form's select box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Topic {
    #[default]
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
    Sales,
    Support,
    Partnership,
    Careers,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralInquiry => "General Inquiry",
            Self::Sales => "Sales",
            Self::Support => "Support",
            Self::Partnership => "Partnership",
            Self::Careers => "Careers",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contact form submission, as posted by the site.
///
/// Missing string fields decode as empty so that a bot tripping the
/// honeypot is caught before field validation would reveal anything.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub topic: Topic,
    #[serde(default)]
    pub message: String,
    /// Hidden field; humans never fill it in
    #[serde(default)]
    pub honeypot: Option<String>,
    #[serde(default)]
    pub turnstile_token: Option<String>,
}

impl Submission {
    /// Decode a request body. Only a JSON object is a submission; serde
    /// would otherwise accept `[]` as a struct with every field defaulted.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom("submission must be a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// True when the hidden honeypot field carries anything but whitespace.
    pub fn is_bot(&self) -> bool {
        self.honeypot
            .as_deref()
            .is_some_and(|h| !h.trim().is_empty())
    }

    /// Copy with surrounding whitespace stripped from every text field.
    /// Blank optional fields become `None`.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            company: self.company.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: trim_optional(self.phone.as_deref()),
            topic: self.topic,
            message: self.message.trim().to_string(),
            honeypot: trim_optional(self.honeypot.as_deref()),
            turnstile_token: trim_optional(self.turnstile_token.as_deref()),
        }
    }

    /// Render the notification email body. Every field is escaped.
    pub fn render_email_html(&self) -> String {
        let message = escape_html(&self.message).replace('\n', "<br/>");
        format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Company:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Phone:</strong> {}</p>\n\
             <p><strong>Topic:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n",
            escape_html(&self.name),
            escape_html(&self.company),
            escape_html(&self.email),
            escape_html(self.phone.as_deref().unwrap_or("")),
            escape_html(self.topic.as_str()),
            message,
        )
    }
}

fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Escape the five characters that can break out of HTML text or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
