//! Renders a `{{placeholder}}` template through a buffered replacer and
//! shows how the fault handler decides what happens to unknown names.

use pipeio::{ops, replacer, Error, PlaceholderFault, ReplacerOptions, ReplacerSource, Result, SinkExt, SourceExt};
use std::collections::HashMap;

const TEMPLATE: &[u8] = b"Hello, {{name}}! Your build {{build}} finished in {{secs}}s.\n";

fn values() -> HashMap<String, String> {
    HashMap::from([
        ("name".to_string(), "Ada".to_string()),
        ("build".to_string(), "#1815".to_string()),
        ("secs".to_string(), "42".to_string()),
    ])
}

fn render_all() -> Result<()> {
    println!("[render_all] Rendering a template with every placeholder resolved");
    let mut src = TEMPLATE.buffered().replacing(values(), replacer::fail_fast);
    let mut out: Vec<u8> = Vec::new();
    let mut buf = [0u8; 16];
    {
        let mut sink = (&mut out).counting();
        ops::copy_all(&mut src, &mut sink, &mut buf)?;
        println!("[render_all] Wrote {} bytes", sink.count());
    }
    print!("{}", String::from_utf8_lossy(&out));
    Ok(())
}

fn unknown_name_fails_fast() {
    println!("[unknown_name_fails_fast] Rendering with a missing value (expected error)");
    let mut src = ReplacerSource::new(&b"Hi {{who}}"[..], HashMap::new(), replacer::fail_fast);
    let mut out: Vec<u8> = Vec::new();
    let mut buf = [0u8; 16];
    match ops::copy_all(&mut src, &mut out, &mut buf) {
        Err(Error::Placeholder(fault)) => println!("[unknown_name_fails_fast] {fault}"),
        other => panic!("expected a placeholder error, got {other:?}"),
    }
}

fn custom_delimiters_with_logging_handler() -> Result<()> {
    println!("[custom_delimiters_with_logging_handler] Using ${{...}} delimiters and logging faults");
    let options = ReplacerOptions::new().with_delimiters("${", "}");
    let mut faults = Vec::new();
    let out = {
        let mut src = ReplacerSource::with_options(
            &b"PATH=${home}/bin:${missing}"[..],
            HashMap::from([("home".to_string(), "/home/ada".to_string())]),
            |fault: &PlaceholderFault| {
                faults.push(fault.to_string());
                Ok(())
            },
            options,
        )?;
        let mut out: Vec<u8> = Vec::new();
        let mut buf = [0u8; 8];
        ops::copy_all(&mut src, &mut out, &mut buf)?;
        out
    };
    println!(
        "[custom_delimiters_with_logging_handler] Output: {}",
        String::from_utf8_lossy(&out)
    );
    for fault in faults {
        println!("[custom_delimiters_with_logging_handler] Fault: {fault}");
    }
    Ok(())
}

fn main() -> Result<()> {
    render_all()?;
    unknown_name_fails_fast();
    custom_delimiters_with_logging_handler()?;
    Ok(())
}
