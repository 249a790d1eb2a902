//! Headless demo driver: load a page, toggle dark mode, mutate the document,
//! and report what got counter-filtered.

use anyhow::{Context, Result};
use darkmode::DarkModeConfig;
use log::{error, info};
use page::{JsonFileStore, PageSession};
use std::env;
use std::fs;

const DEMO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Umbra demo</title></head>
<body>
  <nav class="chrome">umbra</nav>
  <main>
    <h1>Reading at night</h1>
    <p>Plain text is handled by the page-wide inversion.</p>
    <img src="photo.jpg" alt="a photo that must keep its colors">
    <div class="terminal">$ already-dark terminal snippet</div>
    <section style="background-image: url(paper.png)">textured card</section>
  </main>
</body>
</html>"#;

const DEMO_SHEET: &str = "
.chrome { background-color: #14161a }
.terminal { background-color: #0b0e11 }
main { background-color: #ffffff }
";

pub fn main() {
    env_logger::init();

    if let Err(error) = run() {
        error!("umbra failed: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let markup = match args.next() {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEMO_PAGE.to_string(),
    };
    let stylesheet = match args.next() {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEMO_SHEET.to_string(),
    };

    let store = JsonFileStore::open("umbra-prefs.json");
    let mut session = PageSession::new(
        &markup,
        &stylesheet,
        DarkModeConfig::default(),
        Box::new(store),
    )?;

    let enabled = session.toggle()?;
    info!("dark mode {}", if enabled { "on" } else { "off" });

    // Late content, the way an SPA would add it after load.
    if enabled && let Some(body) = session.doc().body() {
        let late = session.doc_mut().create_element("img");
        session.doc_mut().set_attribute(late, "src", "late.png")?;
        session.doc_mut().append_child(body, late)?;
        if !session.pump_until_settled(8)? {
            info!("pipeline still busy after 8 pumps");
        }
    }

    report(&session);
    Ok(())
}

fn report(session: &PageSession) {
    let doc = session.doc();
    let dark = session.dark();
    if let Some(root) = doc.document_element() {
        info!("root style: {:?}", doc.attribute(root, "style"));
    }
    for &node in dark.registry().entries() {
        let tag = doc.tag(node).unwrap_or("?");
        info!(
            "counter-filtered <{tag}>: {:?}",
            doc.attribute(node, "style")
        );
    }
    info!(
        "{} element(s) counter-filtered, {} drain pass(es), {} element(s) processed",
        dark.registry().len(),
        dark.batcher().drain_passes(),
        dark.batcher().processed_total()
    );
}
