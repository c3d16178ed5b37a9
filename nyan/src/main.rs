//! Command-line front end for the Nyan runtime: `run` executes a source
//! or binary file to completion; `build` lowers a source file into the
//! compact binary form described in `nyan-format`; `translate` lowers a
//! Brainfuck-like source file into Nyan source via `nyan-translate`.
//!
//! Argument parsing, exit codes, and the help text are the only things
//! this crate owns; everything else is delegated to `nyan-core`,
//! `nyan-format`, and `nyan-translate`.

use {
    anyhow::{bail, Context, Result},
    std::path::{Path, PathBuf},
    tracing_subscriber::EnvFilter,
};

const USAGE: &str = "\
usage: nyan <command> [arguments]

commands:
  run <file> [-d|--debug]        run a .nyan or .nya file
  build <file> [-o <out>]        compile a .nyan file to .nya
  translate <file> [-o <out>]    translate a Brainfuck file to .nyan
";

fn main()
{
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.split_first() {
        None => {
            println!("{USAGE}");
            std::process::exit(1);
        }
        Some((cmd, rest)) if cmd == "run" => run_command(rest),
        Some((cmd, rest)) if cmd == "build" => build_command(rest),
        Some((cmd, rest)) if cmd == "translate" => translate_command(rest),
        Some((cmd, _)) => {
            // The original implementation dispatches unrecognized
            // commands to a dynamically imported `nyan_ext_<cmd>`
            // module; that extension-loader mechanism is out of scope
            // here, so an unknown command is simply an error.
            println!("unknown command {cmd:?}\n\n{USAGE}");
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool)
{
    if !debug {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_command(args: &[String]) -> Result<()>
{
    let Some(file) = args.first() else {
        println!("{USAGE}");
        std::process::exit(1);
    };
    let debug = args[1..].iter().any(|a| a == "-d" || a == "--debug");

    init_tracing(debug);

    let config = nyan_core::Config{debug, ..Default::default()};
    let mut engine = nyan_core::Engine::load(Path::new(file), config)
        .with_context(|| format!("loading {file}"))?;

    engine
        .run(std::io::stdin(), std::io::stdout())
        .with_context(|| format!("running {file}"))?;

    Ok(())
}

fn build_command(args: &[String]) -> Result<()>
{
    let Some(file) = args.first() else {
        println!("{USAGE}");
        std::process::exit(1);
    };
    let src = Path::new(file);

    let out = find_flag_value(&args[1..], "-o", "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| src.with_extension("nya"));

    if out.extension().and_then(|e| e.to_str()) != Some("nya") {
        bail!("{}: output path must end in .nya", out.display());
    }

    let text = std::fs::read_to_string(src)
        .with_context(|| format!("reading {}", src.display()))?;
    let tokens = nyan_core::parse_source(&text)
        .with_context(|| format!("parsing {}", src.display()))?;

    let manifest_entries = nyan_core::read_manifest(&nyan_core::manifest_path_for(src))
        .with_context(|| format!("reading manifest for {}", src.display()))?
        .unwrap_or_default();

    let mut binary_manifest = Vec::with_capacity(manifest_entries.len());
    for entry in manifest_entries {
        binary_manifest.push(nyan_format::BinaryManifestEntry{
            local_port: nyan_format::port_to_u16(entry.local_port)?,
            remote_port: nyan_format::port_to_u16(entry.remote_port)?,
            filename: entry.path,
        });
    }

    nyan_format::Builder::new()
        .with_manifest(binary_manifest)
        .write_to(&tokens, &out)
        .with_context(|| format!("building {}", out.display()))?;

    println!("wrote {}", out.display());
    Ok(())
}

fn translate_command(args: &[String]) -> Result<()>
{
    let Some(file) = args.first() else {
        println!("{USAGE}");
        std::process::exit(1);
    };
    let src = Path::new(file);

    let out = find_flag_value(&args[1..], "-o", "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| src.with_extension("nyan"));

    nyan_translate::translate_file(src, &out)
        .with_context(|| format!("translating {} to {}", src.display(), out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}

fn find_flag_value<'a>(args: &'a [String], short: &str, long: &str) -> Option<&'a str>
{
    args.iter()
        .position(|a| a == short || a == long)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
