/*
 * The contents of this file are subject to the terms of the
 * Common Development and Distribution License, Version 1.0 only
 * (the "License").  You may not use this file except in compliance
 * with the License.
 *
 * See the file LICENSE in this distribution for details.
 * A copy of the CDDL is also available via the Internet at
 * http://www.opensource.org/licenses/cddl1.txt
 *
 * When distributing Covered Code, include this CDDL HEADER in each
 * file and include the contents of the LICENSE file from this
 * distribution.
 */

// vidroute
// - main.rs file -

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use vidroute::config::{resolvers_from, Config};
use vidroute::{registry, ParseResult, Resolver};

#[derive(Parser)]
#[clap(
    version,
    about = "Finds the video platform of a URL and lists resolver links for it",
    long_about = None
)]
struct Args {
    #[clap(long, short = 'v', help = "Talks more while the URL is processed")]
    verbose: bool,

    #[clap(long, short = 'j', help = "Prints the whole result as JSON")]
    json: bool,

    #[clap(long, short = 'p', help = "Checks which resolvers currently answer with a player")]
    probe: bool,

    #[clap(long, short = 't', help = "Sets the HTTP timeout in seconds")]
    timeout: Option<u64>,

    #[clap(
        long,
        short = 'r',
        help = "Selects the resolver list: \"general\", \"youku\" or a JSON file"
    )]
    resolvers: Option<String>,

    #[clap(long, short = 'c', help = "Reads settings from a JSON file")]
    config: Option<String>,

    #[clap(long = "list-platforms", help = "Lists the supported platforms and exits")]
    list_platforms: bool,

    #[clap(long = "list-resolvers", help = "Lists the configured resolvers and exits")]
    list_resolvers: bool,

    #[clap(
        help = "Sets the input URL to use",
        index = 1,
        required_unless_present_any = ["list_platforms", "list_resolvers"]
    )]
    url: Option<String>,
}

// File first, then the environment, then the command line.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config = config.with_env()?;

    if let Some(secs) = args.timeout {
        config = config.with_timeout(secs)?;
    }
    if let Some(spec) = &args.resolvers {
        config = config.with_templates(resolvers_from(spec)?)?;
    }

    Ok(config)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_platforms() {
    for descriptor in registry() {
        println!("{:<14} {}", descriptor.key, descriptor.display_name);
    }
}

fn print_resolvers(config: &Config) {
    for (rank, template) in config.templates.iter().enumerate() {
        println!("{}. {}: {}", rank + 1, template.name(), template.display_pattern());
    }
    println!("(built-in lists: general, youku)");
}

fn print_result(result: &ParseResult) {
    if let Some(err) = result.error() {
        match result.platform_name() {
            Some(platform) => println!("{} was detected, but: {}", platform, err.message),
            None => println!("vidroute does not know this platform: {}", result.url()),
        }
        return;
    }

    if let (Some(platform), Some(video)) = (result.platform_name(), result.video()) {
        println!("Platform: {}", platform);
        println!("Title:    {}", video.title);
        if !video.video_id.is_empty() {
            println!("Video id: {}", video.video_id);
        }
        println!("Duration: {}", video.duration());
        if let Some(thumbnail) = &video.thumbnail_url {
            println!("Preview:  {}", thumbnail);
        }
        if video.is_restricted_content {
            println!("(mostly paid content, a resolver is probably needed)");
        }
    }

    println!();
    for route in result.routes() {
        println!("[{}] {}", route.rank + 1, route.name);
        println!("    {}", route.url);
    }
}

fn probe_routes(resolver: &Resolver, result: &ParseResult) -> Result<()> {
    let routes = result.routes();
    let pb = ProgressBar::new(routes.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} {msg}",
        )
        .context("invalid progress bar template")?
        .progress_chars("#>-"),
    );

    let results = resolver.probe_routes(result, |route, _| {
        pb.set_message(route.name.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    println!();
    for (route, availability) in routes.iter().zip(&results) {
        println!("[{}] {}: {}", route.rank + 1, route.name, availability);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Argument parsing:
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;

    if args.list_platforms || args.list_resolvers {
        if args.list_platforms {
            print_platforms();
        }
        if args.list_resolvers {
            print_resolvers(&config);
        }
        return Ok(());
    }

    let Some(in_url) = args.url.as_deref() else {
        bail!("no URL given");
    };

    let resolver = Resolver::new(config);
    let result = resolver.resolve(in_url);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if args.probe && result.success() {
        probe_routes(&resolver, &result)?;
    }

    Ok(())
}
