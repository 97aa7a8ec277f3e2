// SPDX-License-Identifier: MIT
//
// hws — highlight whitespace runs in files.
//
// The binary wires the three crates together the same way an editor would:
//
//   hws-host   → in-memory host: window, views, settings, key map, styles
//   hws-plugin → the whitespace highlighter, registered as a plugin
//   hws-core   → region set names used when reading the results back
//
// Each file is opened in the host, which fires load and activated events;
// the highlighter scans it on those events exactly as it would inside an
// editor. The CLI then reads the region sets back and prints them:
//
//   src/lib.rs:12:5: tabs x1 [invalid]
//   src/lib.rs:14:9: spaces x3 [invalid]
//
// or, with --render, prints the text with the regions painted in color.

use std::env;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hws_core::region::{Region, RegionKey};
use hws_host::settings::Settings;
use hws_host::style::{self, StyleTable};
use hws_host::{Host, MemoryView};
use hws_plugin::{default_keymap, WhitespaceHighlighter};

const USAGE: &str = "\
usage: hws [options] FILE...

Report runs of two or more spaces and runs of tabs in each FILE.

options:
  --settings FILE   read highlighter settings from a JSON file
  --syntax NAME     syntax name given to every opened buffer
  --render          print the files with whitespace runs highlighted
  --tab-width N     tab stop width used by --render (default 4)
  --check           exit with status 1 if any run was found
  -h, --help        show this help

Set RUST_LOG=debug to see every scan and skipped buffer.";

// ─── Options ────────────────────────────────────────────────────────────────

/// Parsed command-line options.
#[derive(Debug, PartialEq, Eq)]
struct Options {
    settings: Option<PathBuf>,
    syntax: Option<String>,
    render: bool,
    check: bool,
    tab_width: usize,
    help: bool,
    files: Vec<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            settings: None,
            syntax: None,
            render: false,
            check: false,
            tab_width: 4,
            help: false,
            files: Vec::new(),
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => opts.help = true,
            "--render" => opts.render = true,
            "--check" => opts.check = true,
            "--settings" => {
                let path = args.next().context("--settings needs a file")?;
                opts.settings = Some(PathBuf::from(path));
            }
            "--syntax" => {
                opts.syntax = Some(args.next().context("--syntax needs a name")?);
            }
            "--tab-width" => {
                let n = args.next().context("--tab-width needs a number")?;
                opts.tab_width = n
                    .parse()
                    .with_context(|| format!("invalid tab width `{n}`"))?;
            }
            "--" => opts.files.extend(args.by_ref().map(PathBuf::from)),
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown option `{flag}`"),
            _ => opts.files.push(PathBuf::from(&arg)),
        }
    }
    if !opts.help && opts.files.is_empty() {
        bail!("no input files");
    }
    Ok(opts)
}

/// Load the settings file, falling back to defaults when it is unusable.
fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::new();
    };
    match Settings::load(path) {
        Ok(settings) => {
            info!(path = %path.display(), "loaded settings");
            settings
        }
        Err(e) => {
            warn!("{e}; using default settings");
            Settings::new()
        }
    }
}

// ─── Reporting ──────────────────────────────────────────────────────────────

/// Print one line per highlighted region, in document order. Returns the
/// number of regions printed.
fn report(out: &mut impl Write, name: &str, view: &MemoryView) -> io::Result<usize> {
    let mut found: Vec<(Region, RegionKey, &str)> = Vec::new();
    for key in RegionKey::ALL {
        if let Some(set) = view.region_set(key.name()) {
            found.extend(set.regions.iter().map(|r| (*r, key, set.scope.as_str())));
        }
    }
    found.sort();

    for (region, key, scope) in &found {
        let pos = view.buffer().char_to_pos(region.start).unwrap_or_default();
        writeln!(
            out,
            "{name}:{}:{}: {key} x{} [{scope}]",
            pos.line + 1,
            pos.col + 1,
            region.len()
        )?;
    }
    Ok(found.len())
}

/// Number of whitespace regions currently highlighted in `view`.
fn region_count(view: &MemoryView) -> usize {
    RegionKey::ALL
        .into_iter()
        .filter_map(|key| view.region_set(key.name()))
        .map(|set| set.regions.len())
        .sum()
}

/// Open every file, write the report (or rendering) to `out`, and pick the
/// exit status: 2 if any file could not be opened, 1 if `--check` found
/// regions, 0 otherwise.
fn run(opts: &Options, out: &mut impl Write) -> Result<ExitCode> {
    let settings = load_settings(opts.settings.as_deref());
    let mut host = Host::new(settings, default_keymap());
    host.register(Box::new(WhitespaceHighlighter::from_settings(host.settings())));

    let mut opened = Vec::new();
    let mut failed = false;
    for path in &opts.files {
        match host.open_file(path, opts.syntax.as_deref()) {
            Ok(id) => opened.push((path, id)),
            Err(e) => {
                eprintln!("hws: {}: {e}", path.display());
                failed = true;
            }
        }
    }

    let styles = StyleTable::with_defaults();
    let mut total = 0;
    for (path, id) in opened {
        let Some(view) = host.window().view(id) else {
            continue;
        };
        if opts.render {
            total += region_count(view);
            style::render(out, view, &styles, opts.tab_width)?;
        } else {
            total += report(out, &path.display().to_string(), view)?;
        }
    }
    out.flush()?;

    Ok(if failed {
        ExitCode::from(2)
    } else if opts.check && total > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let opts = match parse_args(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("hws: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if opts.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&opts, &mut out).unwrap_or_else(|e| {
        eprintln!("hws: {e:#}");
        ExitCode::from(2)
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hws_core::Config;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    // ── parse_args ────────────────────────────────────────────────────────

    #[test]
    fn parse_files_and_flags() {
        let opts = parse_args(args(&[
            "--render", "--settings", "s.json", "--tab-width", "8", "a.rs", "b.rs",
        ]))
        .unwrap();
        assert_eq!(
            opts,
            Options {
                settings: Some(PathBuf::from("s.json")),
                render: true,
                tab_width: 8,
                files: vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")],
                ..Options::default()
            }
        );
    }

    #[test]
    fn parse_double_dash_takes_rest_as_files() {
        let opts = parse_args(args(&["--check", "--", "--render"])).unwrap();
        assert!(opts.check);
        assert!(!opts.render);
        assert_eq!(opts.files, vec![PathBuf::from("--render")]);
    }

    #[test]
    fn parse_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["--bogus", "a"])).is_err());
        assert!(parse_args(args(&["--settings"])).is_err());
        assert!(parse_args(args(&["--tab-width", "x", "a"])).is_err());
    }

    #[test]
    fn parse_help_needs_no_files() {
        assert!(parse_args(args(&["-h"])).unwrap().help);
    }

    // ── load_settings ─────────────────────────────────────────────────────

    #[test]
    fn unreadable_settings_fall_back_to_defaults() {
        assert_eq!(
            load_settings(Some(Path::new("/nonexistent/hws.json"))),
            Settings::new()
        );
        assert_eq!(load_settings(None), Settings::new());
    }

    #[test]
    fn settings_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "highlight_whitespaces_enabled": false }}"#).unwrap();
        let settings = load_settings(Some(file.path()));
        assert!(!WhitespaceHighlighter::from_settings(&settings).is_enabled());
    }

    // ── report ────────────────────────────────────────────────────────────

    #[test]
    fn report_lists_regions_in_document_order() {
        let mut host = Host::new(Settings::new(), default_keymap());
        host.register(Box::new(WhitespaceHighlighter::new(Config::default())));
        let id = host.open_text("a\tb  c\n\t   d", None);

        let mut out = Vec::new();
        let n = report(&mut out, "f.txt", host.window().view(id).unwrap()).unwrap();
        assert_eq!(n, 4);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "f.txt:1:2: tabs x1 [invalid]\n\
             f.txt:1:4: spaces x2 [invalid]\n\
             f.txt:2:1: tabs x1 [invalid]\n\
             f.txt:2:2: spaces x3 [invalid]\n"
        );
    }

    #[test]
    fn report_empty_when_disabled() {
        let mut host = Host::new(Settings::new(), default_keymap());
        host.register(Box::new(WhitespaceHighlighter::new(Config {
            enabled: false,
            ..Config::default()
        })));
        let id = host.open_text("a\t\tb", None);
        let mut out = Vec::new();
        assert_eq!(report(&mut out, "f", host.window().view(id).unwrap()).unwrap(), 0);
        assert!(out.is_empty());
    }

    // ── run ───────────────────────────────────────────────────────────────

    fn temp_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{text}").unwrap();
        file
    }

    fn run_to_string(opts: &Options) -> (ExitCode, String) {
        let mut out = Vec::new();
        let code = run(opts, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn check_with_findings_exits_1() {
        let file = temp_file("a\t\tb   c");
        let (code, out) = run_to_string(&Options {
            check: true,
            files: vec![file.path().to_path_buf()],
            ..Options::default()
        });
        assert_eq!(code, ExitCode::from(1));
        let name = file.path().display();
        assert_eq!(
            out,
            format!("{name}:1:2: tabs x2 [invalid]\n{name}:1:5: spaces x3 [invalid]\n")
        );
    }

    #[test]
    fn render_check_with_findings_exits_1() {
        let file = temp_file("a\t\tb   c");
        let (code, out) = run_to_string(&Options {
            render: true,
            check: true,
            files: vec![file.path().to_path_buf()],
            ..Options::default()
        });
        assert_eq!(code, ExitCode::from(1));
        assert!(out.contains('\x1b'));
    }

    #[test]
    fn findings_without_check_exit_0() {
        let file = temp_file("a  b");
        let opts = Options {
            files: vec![file.path().to_path_buf()],
            ..Options::default()
        };
        assert_eq!(run_to_string(&opts).0, ExitCode::SUCCESS);
        let render = Options { render: true, ..opts };
        assert_eq!(run_to_string(&render).0, ExitCode::SUCCESS);
    }

    #[test]
    fn clean_file_with_check_exits_0() {
        let file = temp_file("a b\nc d\n");
        for render in [false, true] {
            let (code, _) = run_to_string(&Options {
                render,
                check: true,
                files: vec![file.path().to_path_buf()],
                ..Options::default()
            });
            assert_eq!(code, ExitCode::SUCCESS);
        }
    }

    #[test]
    fn unreadable_file_exits_2_and_others_still_report() {
        let file = temp_file("a\tb");
        let (code, out) = run_to_string(&Options {
            check: true,
            files: vec![
                PathBuf::from("/nonexistent/hws-input.txt"),
                file.path().to_path_buf(),
            ],
            ..Options::default()
        });
        assert_eq!(code, ExitCode::from(2));
        assert_eq!(out, format!("{}:1:2: tabs x1 [invalid]\n", file.path().display()));
    }
}
