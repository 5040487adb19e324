use std::fs::File;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use log::{info, warn, Level};

extern crate clap;
use clap::{App, Arg, ArgMatches};

use genoview::{
    AlignReference, AnchorRecovery, Canvas, Dataset, GenomeView, GenoviewError, LayoutConfig, Point,
    Viewport,
};

fn parse_arg<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    match matches.value_of(name) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow!("invalid value for --{}: {}", name, v)),
        None => Ok(None),
    }
}

fn layout_config(matches: &ArgMatches) -> Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    if let Some(spacing) = parse_arg(matches, "spacing")? {
        config.spacing = spacing;
    }
    if let Some(interval) = parse_arg(matches, "scale-interval")? {
        config.scale_interval = interval;
    }
    if let Some(width) = parse_arg(matches, "width")? {
        config.canvas_width = width;
    }
    config.show_scale = !matches.is_present("no-scale");
    config.show_labels = matches.is_present("labels");
    if matches.is_present("fixed-center") {
        config.reference = AlignReference::CanvasCenter;
    }
    Ok(config)
}

fn viewport(matches: &ArgMatches) -> Result<Viewport> {
    let mut vp = Viewport::default();
    if let Some(zoom) = parse_arg(matches, "zoom")? {
        vp.zoom_to_point(Point::new(0.0, 0.0), zoom);
    }
    vp.pan_by(
        parse_arg(matches, "pan-x")?.unwrap_or(0.0),
        parse_arg(matches, "pan-y")?.unwrap_or(0.0),
    );
    Ok(vp)
}

fn main() -> Result<()> {
    let matches = App::new("genoview")
        .version("0.1.0")
        .author("Erik Garrison <erik.garrison@gmail.com>")
        .about("Draw genome tracks with gene arrows, optionally aligned on a gene cluster")
        .arg(Arg::with_name("INPUT")
             .required(true)
             .takes_value(true)
             .index(1)
             .help("input dataset (JSON, optionally gzipped)"))
        .arg(Arg::with_name("png")
             .short("p")
             .long("png")
             .takes_value(true)
             .help("Save the genome view to this PNG file."))
        .arg(Arg::with_name("html")
             .long("html")
             .takes_value(true)
             .help("Save the genome view as an HTML page with the image inlined."))
        .arg(Arg::with_name("align")
             .short("a")
             .long("align")
             .takes_value(true)
             .help("Align all tracks on this gene cluster."))
        .arg(Arg::with_name("clear-on-unknown")
             .long("clear-on-unknown")
             .help("Drop alignment when the requested cluster does not exist (default keeps the previous anchor)."))
        .arg(Arg::with_name("width")
             .short("W")
             .long("width")
             .takes_value(true)
             .help("Canvas width in pixels [default: 1000]."))
        .arg(Arg::with_name("height")
             .short("H")
             .long("height")
             .takes_value(true)
             .help("Canvas height in pixels [default: fit the tracks]."))
        .arg(Arg::with_name("spacing")
             .long("spacing")
             .takes_value(true)
             .help("Vertical spacing between tracks [default: 30]."))
        .arg(Arg::with_name("scale-interval")
             .long("scale-interval")
             .takes_value(true)
             .help("Ruler tick interval in nucleotides [default: 100]."))
        .arg(Arg::with_name("no-scale")
             .long("no-scale")
             .help("Do not draw the ruler and scale bar."))
        .arg(Arg::with_name("labels")
             .long("labels")
             .help("Add a text label per track."))
        .arg(Arg::with_name("fixed-center")
             .long("fixed-center")
             .help("Align on the canvas center instead of the panned viewport center."))
        .arg(Arg::with_name("pan-x")
             .long("pan-x")
             .takes_value(true)
             .allow_hyphen_values(true)
             .help("Horizontal pan in pixels."))
        .arg(Arg::with_name("pan-y")
             .long("pan-y")
             .takes_value(true)
             .allow_hyphen_values(true)
             .help("Vertical pan in pixels."))
        .arg(Arg::with_name("zoom")
             .short("z")
             .long("zoom")
             .takes_value(true)
             .help("Zoom factor, clamped to [0.01, 20]."))
        .arg(Arg::with_name("verbose")
             .short("v")
             .long("verbose")
             .help("Log per-track layout details."))
        .get_matches();

    let level = if matches.is_present("verbose") {
        Level::Debug
    } else {
        Level::Info
    };
    simple_logger::init_with_level(level)?;

    let filename = matches
        .value_of("INPUT")
        .ok_or_else(|| anyhow!("no input dataset given"))?;
    let dataset = Dataset::from_path(filename)
        .with_context(|| format!("could not load dataset {}", filename))?;
    info!(
        "loaded {} tracks and {} gene clusters from {}",
        dataset.tracks().len(),
        dataset.clusters().len(),
        filename
    );

    let config = layout_config(&matches)?;
    let recovery = if matches.is_present("clear-on-unknown") {
        AnchorRecovery::Clear
    } else {
        AnchorRecovery::KeepPrevious
    };
    let mut view = GenomeView::new(dataset, config, recovery)?;
    view.set_viewport(viewport(&matches)?);
    if let Some(gc) = matches.value_of("align") {
        if view.set_alignment_anchor(Some(gc)).is_err() {
            info!("continuing with anchor {}", view.anchor().unwrap_or("none"));
        }
    } else {
        view.relayout()?;
    }
    let layout = view.layout();
    let unaligned = layout
        .diagnostics
        .iter()
        .filter(|d| matches!(d, GenoviewError::AnchorGeneNotFound { .. }))
        .count();
    if unaligned > 0 {
        warn!("{} tracks drawn without alignment", unaligned);
    }

    let width = view.config().canvas_width.max(1.0) as usize;
    let height = match parse_arg::<usize>(&matches, "height")? {
        Some(h) => h,
        None => {
            let bottom = layout.rows() as f64 * 1.25 * view.config().spacing + 20.0;
            (bottom * view.viewport().zoom + view.viewport().pan.y).max(1.0).ceil() as usize
        }
    };
    let mut canvas = Canvas::new(width, height);
    canvas.draw(layout, view.viewport(), view.selection());

    if let Some(png) = matches.value_of("png") {
        canvas.write_png(png)?;
        info!("wrote {}x{} image to {}", width, height, png);
    }
    if let Some(html) = matches.value_of("html") {
        let mut out = File::create(html)?;
        out.write_all(canvas.to_html(filename)?.as_bytes())?;
        info!("wrote {}", html);
    }
    if !matches.is_present("png") && !matches.is_present("html") {
        info!(
            "laid out {} primitives over {} nt; pass --png or --html to save the view",
            layout.primitives().len(),
            layout.genome_max
        );
    }
    Ok(())
}
