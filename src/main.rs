use std::process::ExitCode;

use fontslice::{Face, Subsetter};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let [_, font, text, output] = args.as_slice() else {
        eprintln!("usage: fontslice <font.ttf> <text> <output.ttf>");
        return ExitCode::FAILURE;
    };

    match run(font, text, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(font: &str, text: &str, output: &str) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(font)?;
    let face = Face::parse(&data)?;

    let mut subsetter = Subsetter::new(&face);
    subsetter.add_string(text);
    let subset = subsetter.generate()?;
    std::fs::write(output, &subset)?;

    let stats = subsetter.stats();
    println!(
        "{}: {} of {} glyphs kept ({:.1}%), {} bytes",
        face.font_name(),
        stats.subset_glyphs,
        stats.original_glyphs,
        100.0 * stats.compression_ratio,
        subset.len(),
    );

    Ok(())
}
