use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, eyre, WrapErr};
use log::debug;

use tableau_rs::config::SessionConfig;
use tableau_rs::session::Session;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Script with one command per line (reads stdin if omitted).
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Log level.
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log: simplelog::LevelFilter,

    /// Maximum number of undoable commands.
    #[clap(long, value_name = "INT")]
    history_limit: Option<usize>,

    /// Do not require branching formulas to be checkmarked in `check_all_closed`.
    #[clap(long)]
    lenient: bool,
}

const HELP: &str = "\
commands:
  premise <formula>         add a premise to the root
  add <formula>             add a formula to the current node
  delete <formula>          delete a formula
  branch <formula>          branch the current node on a formula
  delete_branch             delete the branches of the current node
  go_to <node>              move to a node
  justify <child> <parent>  mark the parent of a formula
  checkmark <formula>       checkmark a formula
  close <formula> <formula> close the current node
  reopen <node>             reopen a closed node
  mark_open                 mark the current node open
  check_all_closed          check that every branch is closed
  check_any_open            check that some branch is open
  undo | redo | reset | print | history | help";

fn number(arg: Option<&str>) -> color_eyre::Result<usize> {
    let arg = arg.ok_or_else(|| eyre!("missing argument"))?;
    arg.parse()
        .wrap_err_with(|| format!("invalid number '{}'", arg))
}

fn run(session: &mut Session, line: &str) -> color_eyre::Result<()> {
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));
    let mut args = rest.split_whitespace();
    debug!("command = {:?}, rest = {:?}", command, rest);

    match command {
        "premise" => println!("added formula {}", session.add_premise(rest)?),
        "add" => println!("added formula {}", session.add_formula(rest)?),
        "delete" => session.delete_formula(number(args.next())?)?,
        "branch" => {
            let [l, r] = session.branch(number(args.next())?)?;
            println!("created nodes {} and {}", l, r);
        }
        "delete_branch" => session.delete_branch()?,
        "go_to" => session.go_to(number(args.next())?)?,
        "justify" => session.justify(number(args.next())?, number(args.next())?)?,
        "checkmark" => session.checkmark(number(args.next())?)?,
        "close" => session.close(number(args.next())?, number(args.next())?)?,
        "reopen" => session.reopen(number(args.next())?)?,
        "mark_open" => session.mark_open()?,
        "check_all_closed" => {
            session.check_all_closed()?;
            println!("all branches closed");
        }
        "check_any_open" => {
            session.check_any_open()?;
            println!("open branch found");
        }
        "undo" => println!("undid: {}", session.undo()?),
        "redo" => println!("redid: {}", session.redo()?),
        "reset" => session.reset(),
        "print" => {
            print!("{}", session.tree());
            println!("current node: {}", session.current_display());
        }
        "history" => {
            for (i, entry) in session.history().enumerate() {
                println!("{:>3}  {}", i + 1, entry);
            }
        }
        "help" => println!("{}", HELP),
        _ => bail!("unknown command '{}'", command),
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut config = SessionConfig::default().with_require_checkmarked_branches(!args.lenient);
    if let Some(limit) = args.history_limit {
        config = config.with_history_limit(limit);
    }
    let mut session = Session::with_config(config);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        println!("> {}", line);
        if let Err(e) = run(&mut session, line) {
            println!("error: {}", e);
        }
    }

    Ok(())
}
