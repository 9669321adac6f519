use anyhow::{bail, Context, Result};
use crabfocus::testing::SyntheticFocusCamera;
use crabfocus::{AutofocusController, ContrastDetector, CrabFocusConfig, FocusFrame, FocusPosition};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> Result<()> {
    crabfocus::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: crabfocus-cli <score|simulate|init-config> [args]");
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "score" => cmd_score(&args),
        "simulate" => cmd_simulate(&args),
        "init-config" => cmd_init_config(&args),
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }
}

fn cmd_score(args: &[String]) -> Result<()> {
    // score <image>... [--json]
    let json = args.contains(&"--json".to_string());
    let paths: Vec<&String> = args[2..].iter().filter(|a| !a.starts_with("--")).collect();
    if paths.is_empty() {
        eprintln!("Usage: crabfocus-cli score <image>... [--json]");
        std::process::exit(1);
    }

    let detector = ContrastDetector::default();
    for path in paths {
        let image = image::open(path).with_context(|| format!("Failed to open {}", path))?;
        let frame = FocusFrame::from_image(&image);
        let metrics = detector
            .analyze(frame.as_bytes())
            .with_context(|| format!("Failed to score {}", path))?;

        if json {
            println!(
                "{}",
                serde_json::json!({ "path": path, "metrics": metrics })
            );
        } else {
            println!("{}: {:.3} ({}x{})", path, metrics.score, frame.width, frame.height);
        }
    }
    Ok(())
}

fn cmd_simulate(args: &[String]) -> Result<()> {
    // simulate --start <n> --peak <n> [--radius <n>] [--step <n>]
    //          [--max-iterations <n>] [--config <path>] [--json]
    let mut start: u16 = 0;
    let mut peak: Option<u16> = None;
    let mut radius: u16 = 1024;
    let mut step: Option<u16> = None;
    let mut max_iterations: Option<u64> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--start" => start = flag_value(args, &mut i)?.parse()?,
            "--peak" => peak = Some(flag_value(args, &mut i)?.parse()?),
            "--radius" => radius = flag_value(args, &mut i)?.parse()?,
            "--step" => step = Some(flag_value(args, &mut i)?.parse()?),
            "--max-iterations" => max_iterations = Some(flag_value(args, &mut i)?.parse()?),
            "--config" => config_path = Some(PathBuf::from(flag_value(args, &mut i)?)),
            "--json" => json = true,
            other => bail!("Unknown argument: {}", other),
        }
        i += 1;
    }

    let peak = peak.context("--peak required")?;

    let mut config = match config_path {
        Some(path) => CrabFocusConfig::load_from_file(path)?,
        None => CrabFocusConfig::load_or_default(),
    };
    if let Some(step) = step {
        config.search.step_size = step;
    }
    if max_iterations.is_some() {
        config.search.max_iterations = max_iterations;
    }
    config.validate()?;

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;

    let mut camera = SyntheticFocusCamera::peaked(
        FocusPosition::new(start),
        FocusPosition::new(peak),
        radius,
    );
    let outcome = AutofocusController::from_config(&config)
        .with_cancel_flag(cancel)
        .run(&mut camera)?;

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        println!(
            "Focus: {} ({:?}) after {} frames, contrast {:.3}",
            outcome.position, outcome.termination, outcome.frames_analyzed, outcome.best_score
        );
    }
    Ok(())
}

fn cmd_init_config(args: &[String]) -> Result<()> {
    let path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(CrabFocusConfig::default_path);
    CrabFocusConfig::default().save_to_file(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn flag_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("{} requires a value", flag))
}
