// Input validation utilities

use anyhow::Result;
use regex::Regex;

/// Collect the distinct `{{variable}}` placeholders of a prompt template,
/// in order of first appearance.
pub fn extract_template_variables(template: &str) -> Result<Vec<String>> {
    let var_re = Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").map_err(|e| {
        anyhow::anyhow!("Internal error: failed to compile template regex: {}", e)
    })?;

    let mut out: Vec<String> = Vec::new();
    for cap in var_re.captures_iter(template) {
        let name = cap[1].to_string();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    Ok(out)
}

/// Validate a webhook target. Only absolute http(s) URLs with a host are accepted.
pub fn validate_webhook_url(raw: &str) -> Result<url::Url> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(anyhow::anyhow!("Webhook URL is required"));
    }

    let parsed =
        url::Url::parse(s).map_err(|e| anyhow::anyhow!("Webhook URL is not valid: {}", e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow::anyhow!(
                "Webhook URL must use http or https (got '{}')",
                other
            ))
        }
    }

    if parsed.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(anyhow::anyhow!("Webhook URL must include a host"));
    }

    Ok(parsed)
}

/// Split a comma separated tag list, dropping blanks and duplicates.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        if !tags.iter().any(|existing| existing.eq_ignore_ascii_case(t)) {
            tags.push(t.to_string());
        }
    }
    tags
}

/// Join field labels for a "... is required" message.
pub fn required_message(labels: &[&str]) -> String {
    match labels {
        [] => String::new(),
        [one] => format!("{} is required.", one),
        [init @ .., last] => format!("{} and {} are required.", init.join(", "), last),
    }
}
