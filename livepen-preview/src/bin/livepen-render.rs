use livepen_preview::frame::{frame_element, host_page, Frame};
use livepen_preview::{synth, PreviewConfig, PreviewError};
use std::env;
use std::fs;
use std::process;
use uuid::Uuid;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let frame = args.iter().any(|a| a == "--frame");
    let page = args.iter().any(|a| a == "--page");
    let files: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    if files.len() != 3 {
        eprintln!("Usage: livepen-render [--frame | --page] <markup.html> <style.css> <script.js>");
        eprintln!();
        eprintln!("Prints the composite preview document. With --frame, prints the sandboxed");
        eprintln!("iframe element instead; with --page, a standalone page embedding it.");
        process::exit(1);
    }

    match render(files[0], files[1], files[2], frame, page) {
        Ok(out) => print!("{}", out),
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn render(
    markup: &str,
    style: &str,
    script: &str,
    frame: bool,
    page: bool,
) -> Result<String, PreviewError> {
    let doc = synth::build(
        &fs::read_to_string(markup)?,
        &fs::read_to_string(style)?,
        &fs::read_to_string(script)?,
    );
    if !frame && !page {
        return Ok(doc.into_string());
    }

    let mut config = PreviewConfig::default();
    config.apply_env()?;
    let key = Uuid::new_v4();
    let element = frame_element(&doc, &config.capabilities, &config.frame, key);
    if page {
        Ok(host_page(&Frame::Live { key, element }, &config.frame.title))
    } else {
        Ok(element)
    }
}
