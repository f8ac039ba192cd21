//! Subcommand implementations. Each returns the text to print.

use crate::value::ManifestValue;
use anyhow::{Context, Result};
use selectkit::{filter, ControlManifest, SelectOption};
use selectkit_test::{script_lines, Harness, Step};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

pub(crate) type Manifest = ControlManifest<ManifestValue>;

#[derive(Serialize)]
struct SectionOut<'a> {
    group: Option<&'a str>,
    options: Vec<&'a SelectOption<ManifestValue>>,
}

/// `selectkit filter`: the filtered, grouped view for `query`.
pub(crate) fn filter_view(manifest: &Manifest, query: &str, json: bool) -> Result<String> {
    let view = filter(&manifest.options, query);
    debug!(query, matches = view.len(), "filtered");

    let sections: Vec<SectionOut<'_>> = view
        .sections()
        .iter()
        .map(|section| SectionOut {
            group: section.group.as_deref(),
            options: view.indices()[section.range.clone()]
                .iter()
                .filter_map(|&i| manifest.options.get(i))
                .collect(),
        })
        .collect();

    if json {
        return serde_json::to_string_pretty(&sections).context("failed to encode view");
    }

    let mut out = String::new();
    if sections.is_empty() {
        out.push_str("(no matches)\n");
    }
    for section in &sections {
        if let Some(group) = section.group {
            let _ = writeln!(out, "{group}:");
        }
        let indent = if section.group.is_some() { "  " } else { "" };
        for option in &section.options {
            let _ = write!(out, "{indent}{} [{}]", option.label, option.value);
            if option.disabled {
                out.push_str(" (disabled)");
            }
            out.push('\n');
        }
    }
    Ok(out)
}

#[derive(Serialize)]
struct StepOut<'a, T> {
    line: usize,
    step: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    changes: &'a [selectkit::SelectionChanged<ManifestValue>],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    closed: &'a [selectkit::CloseReason],
    render: T,
}

/// `selectkit replay`: run a script and emit one JSON render model per step.
pub(crate) fn replay(manifest: Manifest, script: &str, pretty: bool) -> Result<String> {
    let steps = script_lines(script)
        .map(|(line, source)| {
            Step::<ManifestValue>::parse(source)
                .map(|step| (line, source, step))
                .map_err(|message| anyhow::anyhow!("script line {line}: {message}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let control = manifest.into_control().context("invalid manifest")?;
    let mut harness = Harness::new(control);
    let mut out = String::new();

    for (line, source, step) in &steps {
        let changes_before = harness.changes().len();
        let closes_before = harness.close_reasons().len();
        harness.run(step);
        debug!(line, step = source, "replayed");

        let record = StepOut {
            line: *line,
            step: source,
            changes: &harness.changes()[changes_before..],
            closed: &harness.close_reasons()[closes_before..],
            render: harness.render(),
        };
        let encoded = if pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        }
        .context("failed to encode render model")?;
        out.push_str(&encoded);
        out.push('\n');
    }
    Ok(out)
}

/// `selectkit check`: validate a manifest and summarise it.
pub(crate) fn check(manifest: Manifest) -> Result<String> {
    let options = manifest.options.len();
    let disabled = manifest.options.iter().filter(|o| o.disabled).count();
    let mut groups: Vec<&str> = Vec::new();
    for group in manifest.options.iter().filter_map(|o| o.group.as_deref()) {
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    let summary = format!(
        "Manifest valid!\n  Mode: {}\n  Ownership: {:?}\n  Options: {options} ({disabled} disabled)\n  Groups: {}\n",
        manifest.config.mode().name(),
        manifest.ownership(),
        if groups.is_empty() {
            "none".to_string()
        } else {
            groups.join(", ")
        },
    );

    let control = manifest.into_control().context("manifest invalid")?;
    let value: Vec<String> = control.value().iter().map(ToString::to_string).collect();
    Ok(format!("{summary}  Value: [{}]\n", value.join(", ")))
}
