use crate::catalog::catalog::Catalog;
use crate::catalog::record_model::InteractionRecord;
use crate::catalog::scanner::scan;
use crate::dom::loader::load_page_file;
use crate::identity::digest::Sha1Digest;
use crate::identity::locator::locate;
use crate::session::probe::ProbeConfig;
use crate::session::script::load_script_file;
use crate::trace_catalog;

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    page_path: &str,
    format: &str,
    output: Option<&str>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page_file(page_path)?;

    if verbose > 0 {
        eprintln!("Scanning {} elements...", doc.elements().len());
    }

    let records = scan(&doc, &Sha1Digest);

    let content = match format {
        "json" => serde_json::to_string_pretty(&records)?,
        _ => format_records_console(&records),
    };
    write_or_print(output, &content)?;

    if verbose > 0 {
        eprintln!("Found {} handler-property records", records.len());
    }
    Ok(())
}

// ============================================================================
// addresses subcommand
// ============================================================================

pub fn cmd_addresses(page_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page_file(page_path)?;

    for node in doc.elements() {
        let tag = doc.tag(node).unwrap_or_default();
        let id = doc.id(node);
        let label = if id.is_empty() {
            format!("<{}>", tag)
        } else {
            format!("<{} id=\"{}\">", tag, id)
        };
        println!("{:<24} {}", label, locate(&doc, node));
    }

    Ok(())
}

// ============================================================================
// trace subcommand
// ============================================================================

pub fn cmd_trace(
    page_path: &str,
    script_path: &str,
    format: &str,
    output: Option<&str>,
    config: &ProbeConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page_file(page_path)?;
    let script = load_script_file(script_path)?;

    if verbose > 0 {
        eprintln!("Replaying {} scripted calls...", script.calls.len());
    }

    let catalog = trace_catalog(doc, &script, config)?;

    if verbose > 0 {
        eprintln!(
            "Cataloged {} records, {} timers, {} requests, {} window targets",
            catalog.records.len(),
            catalog.timers.len(),
            catalog.requests.len(),
            catalog.window_targets.len()
        );
    }

    let content = match format {
        "json" => serde_json::to_string_pretty(&catalog)?,
        _ => format_catalog_console(&catalog),
    };
    write_or_print(output, &content)?;

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn write_or_print(output: Option<&str>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => println!("{}", content),
    }
    Ok(())
}

fn short_id(function_id: &str) -> &str {
    if function_id.len() > 12 {
        &function_id[..12]
    } else {
        function_id
    }
}

pub fn format_records_console(records: &[InteractionRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} interaction records\n", records.len()));
    for record in records {
        out.push_str(&format!(
            "  [{}] {} fid={} visible={}\n",
            record.event,
            if record.addr.is_empty() {
                "(unaddressed)"
            } else {
                &record.addr
            },
            short_id(&record.function_id),
            record.is_visible
        ));
    }
    out
}

pub fn format_catalog_console(catalog: &Catalog) -> String {
    let mut out = format_records_console(&catalog.records);
    if !catalog.timers.is_empty() {
        out.push_str(&format!("{} timers\n", catalog.timers.len()));
        for timer in &catalog.timers {
            out.push_str(&format!(
                "  {} {}ms fid={}\n",
                if timer.repeating { "every" } else { "after" },
                timer.delay_ms,
                short_id(&timer.function_id)
            ));
        }
    }
    if !catalog.requests.is_empty() {
        out.push_str(&format!("{} requests\n", catalog.requests.len()));
        for request in &catalog.requests {
            out.push_str(&format!("  {} {}\n", request.method, request.url));
        }
    }
    if !catalog.window_targets.is_empty() {
        out.push_str(&format!(
            "{} window targets\n",
            catalog.window_targets.len()
        ));
        for url in &catalog.window_targets {
            out.push_str(&format!("  {}\n", url));
        }
    }
    out
}
