use std::io::Read;
use std::{fs, io};

use calcora::get_result;
use clap::Parser;

/// calcora is an easy to use, domain-specific programming language for
/// numeric mathematics with complex numbers, matrices and physical units.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treats the input as a path to a script file.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode is a feature that automatically prints out the last
    /// printable value of a calcora script.
    #[arg(short, long)]
    pipe_mode: bool,

    /// The script itself, a path with --file, or '-' to read the script
    /// from standard input.
    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = match read_script(&args) {
        Ok(script) => script,
        Err(error) => {
            eprintln!("Failed to read '{}': {error}", args.contents);
            std::process::exit(1);
        },
    };

    if let Err(error) = get_result(&script, args.pipe_mode) {
        eprintln!("{error}");
        std::process::exit(2);
    }
}

fn read_script(args: &Args) -> io::Result<String> {
    if args.contents == "-" {
        let mut script = String::new();

        io::stdin().read_to_string(&mut script)?;

        return Ok(script);
    }

    if args.file {
        return fs::read_to_string(&args.contents);
    }

    Ok(args.contents.clone())
}
