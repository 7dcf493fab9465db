extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate flamegen;
#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use flamegen::{
    save_image, ImageFormat, ImageProcessor, LogGammaCorrection, MultiThreadRenderer, Rect,
    RenderParams, Renderer, SingleThreadRenderer, Variation,
};

/// Given a string and a separator, returns the two values separated
/// by the separator.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// Parses "x,y,width,height" into the world rect.  The extents must
/// be positive.
fn parse_rect(s: &str) -> Option<Rect> {
    let fields: Vec<f64> = match s.split(',').map(|f| f64::from_str(f.trim())).collect() {
        Ok(fields) => fields,
        Err(_) => return None,
    };
    if fields.len() != 4 || fields[2] <= 0.0 || fields[3] <= 0.0 {
        return None;
    }
    Some(Rect::new(fields[0], fields[1], fields[2], fields[3]))
}

/// Parses a comma-separated list of variation names.
fn parse_variations(s: &str) -> Result<Vec<Variation>, String> {
    s.split(',')
        .map(|name| Variation::from_str(name.trim()))
        .collect()
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const FORMAT: &str = "format";
const SIZE: &str = "size";
const RECT: &str = "rect";
const RENDERER: &str = "renderer";
const AFFINES: &str = "affines";
const SAMPLES: &str = "samples";
const ITERATIONS: &str = "iterations";
const STEPS: &str = "steps";
const SYMMETRY: &str = "symmetry";
const GAMMA: &str = "gamma";
const VARIATIONS: &str = "variations";

fn args<'a>() -> ArgMatches<'a> {
    App::new("flamegen")
        .version("0.1.0")
        .about("Flame fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file stem; the format extension is appended"),
        )
        .arg(
            Arg::with_name(FORMAT)
                .required(false)
                .long(FORMAT)
                .takes_value(true)
                .default_value("png")
                .validator(|s| ImageFormat::from_str(&s).map(|_| ()))
                .help("Output image format (png, bmp or jpeg)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| match parse_pair::<usize>(&s, 'x') {
                    Some((w, h)) if w > 0 && h > 0 => Ok(()),
                    _ => Err("Could not parse output image size".to_string()),
                })
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(RECT)
                .required(false)
                .long(RECT)
                .short("r")
                .takes_value(true)
                .default_value("-1.777,-1.0,3.554,2.0")
                .validator(|s| match parse_rect(&s) {
                    Some(_) => Ok(()),
                    None => Err("Could not parse world rect (x,y,width,height)".to_string()),
                })
                .help("World region to render, as x,y,width,height"),
        )
        .arg(
            Arg::with_name(RENDERER)
                .required(false)
                .long(RENDERER)
                .takes_value(true)
                .default_value("multi")
                .possible_values(&["single", "multi"])
                .help("Rendering strategy"),
        )
        .arg(
            Arg::with_name(AFFINES)
                .required(false)
                .long(AFFINES)
                .takes_value(true)
                .default_value("6")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        1024,
                        "Could not parse affine transformation count",
                        "Affine transformation count must be between 1 and 1024",
                    )
                })
                .help("Number of random affine transformations"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .takes_value(true)
                .default_value("20000")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        100_000_000,
                        "Could not parse sample count",
                        "Sample count must be between 1 and 100000000",
                    )
                })
                .help("Number of chaos-game samples"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("120")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Recorded iterations per sample"),
        )
        .arg(
            Arg::with_name(STEPS)
                .required(false)
                .long(STEPS)
                .takes_value(true)
                .default_value("20")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        0,
                        100_000,
                        "Could not parse normalization step count",
                        "Normalization step count must be between 0 and 100000",
                    )
                })
                .help("Discarded settling iterations per sample"),
        )
        .arg(
            Arg::with_name(SYMMETRY)
                .required(false)
                .long(SYMMETRY)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        64,
                        "Could not parse symmetry count",
                        "Symmetry count must be between 1 and 64",
                    )
                })
                .help("Rotational copies plotted per recorded point"),
        )
        .arg(
            Arg::with_name(GAMMA)
                .required(false)
                .long(GAMMA)
                .takes_value(true)
                .default_value("2.2")
                .validator(|s| match f64::from_str(&s) {
                    Ok(gamma) if gamma > 0.0 => Ok(()),
                    _ => Err("Gamma must be a number greater than 0".to_string()),
                })
                .help("Gamma correction value"),
        )
        .arg(
            Arg::with_name(VARIATIONS)
                .required(false)
                .long(VARIATIONS)
                .takes_value(true)
                .default_value("spherical,linear")
                .validator(|s| parse_variations(&s).map(|_| ()))
                .help(
                    "Comma-separated variations: linear, disk, exponential, \
                     heart, hyperbolic, polar, spherical",
                ),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let world = parse_rect(matches.value_of(RECT).unwrap())
        .ok_or_else(|| err_msg("Error parsing world rect"))?;
    let variations = parse_variations(matches.value_of(VARIATIONS).unwrap()).map_err(err_msg)?;

    let affines = usize::from_str(matches.value_of(AFFINES).unwrap())?;
    let samples = usize::from_str(matches.value_of(SAMPLES).unwrap())?;
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())?;
    let steps = usize::from_str(matches.value_of(STEPS).unwrap())?;
    let symmetry = usize::from_str(matches.value_of(SYMMETRY).unwrap())?;
    let gamma = f64::from_str(matches.value_of(GAMMA).unwrap())?;

    let params = RenderParams::new(steps, affines, iterations, symmetry, variations)
        .map_err(err_msg)?;
    let renderer: Box<dyn Renderer> = match matches.value_of(RENDERER).unwrap() {
        "single" => Box::new(SingleThreadRenderer::new(params, samples)),
        _ => Box::new(MultiThreadRenderer::new(params, samples)),
    };
    let processor = LogGammaCorrection::new(gamma).map_err(err_msg)?;
    let format = ImageFormat::from_str(matches.value_of(FORMAT).unwrap()).map_err(err_msg)?;

    info!(
        "Rendering {}x{} flame fractal ({} samples, {} renderer)...",
        width,
        height,
        samples,
        matches.value_of(RENDERER).unwrap()
    );
    let start = Instant::now();
    let image = renderer.render(width, height, &world).map_err(err_msg)?;
    processor.process(&image);
    info!("Render finished in {:.2} sec", start.elapsed().as_secs_f64());

    let path = format!("{}.{}", matches.value_of(OUTPUT).unwrap(), format.extension());
    save_image(&image, Path::new(&path)).map_err(err_msg)?;
    info!("Image written to {}", path);
    Ok(())
}

fn main() {
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(err) = run(&matches) {
        error!("Fractal generation failed: {}", err);
        std::process::exit(1);
    }
}
