//! Finding rendering
//!
//! Two consumers: machines get pretty-printed JSON, humans get an indented
//! text report. Rendering never mutates findings.

use std::fmt::Write;

use super::finding::Finding;
use crate::errors::Result;

/// Serialize findings as pretty-printed JSON
pub fn to_json(findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}

/// Render findings as an indented text report
pub fn render_text(findings: &[Finding]) -> String {
    let mut out = String::new();
    for finding in findings {
        let _ = writeln!(
            out,
            "[{}] {}:{} calls {}",
            finding.api_level, finding.procedure, finding.line, finding.callee
        );
        if !finding.tags.is_empty() {
            let tags: Vec<&str> = finding.tags.iter().map(|t| t.as_str()).collect();
            let _ = writeln!(out, "  tags: {}", tags.join(", "));
        }
        for item in &finding.precondition.items {
            let outcome = if item.branch_taken { "taken" } else { "not taken" };
            let _ = writeln!(
                out,
                "  guard: {} {} {} ({}) at {}:{}",
                item.attribute, item.operator, item.value, outcome, item.procedure, item.line
            );
        }
        for condition in &finding.reach_conditions {
            let _ = writeln!(out, "  reached under: {}", condition);
        }
        if !finding.call_stack.is_empty() {
            out.push_str("  called from:\n");
            for line in finding.call_stack.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
        if let Some(source) = &finding.source_text {
            let _ = writeln!(out, "  source: {}", source);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::preconditions::{Precondition, PreconditionItem};
    use crate::shared::models::{ApiLevel, Tag};
    use std::collections::BTreeSet;

    fn finding() -> Finding {
        Finding {
            api_level: ApiLevel(19),
            procedure: "com.app.Main#check".to_string(),
            line: 5,
            callee: "java.util.Date#before".to_string(),
            tags: BTreeSet::from([Tag::new("#now")]),
            precondition: Precondition {
                attribute: "seconds".to_string(),
                declaring_type: "java.util.Date".to_string(),
                declaring_class: "com.app.Main".to_string(),
                items: vec![PreconditionItem {
                    procedure: "com.app.Main#check".to_string(),
                    line: 4,
                    attribute: "seconds".to_string(),
                    operator: ">".to_string(),
                    value: "30".to_string(),
                    branch_taken: true,
                }],
            },
            reach_conditions: vec!["mode == 1".to_string()],
            call_stack: "com.app.Main#check\n".to_string(),
            source_text: Some("if (t.getSeconds() > 30) { ... }".to_string()),
        }
    }

    #[test]
    fn test_text_report_mentions_every_section() {
        let text = render_text(&[finding()]);
        assert!(text.contains("[api-19] com.app.Main#check:5 calls java.util.Date#before"));
        assert!(text.contains("tags: #now"));
        assert!(text.contains("guard: seconds > 30 (taken) at com.app.Main#check:4"));
        assert!(text.contains("reached under: mode == 1"));
        assert!(text.contains("source: if (t.getSeconds() > 30)"));
    }

    #[test]
    fn test_json_is_parseable() {
        let json = to_json(&[finding()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["callee"], "java.util.Date#before");
        assert_eq!(parsed[0]["precondition"]["items"][0]["operator"], ">");
    }
}
