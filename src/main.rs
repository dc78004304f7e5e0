// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod catalog;
mod collect;
mod database;
mod error;
mod propose;
mod resolve;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

/// Record recipes, or find the ones that fit what you have.
///
/// With neither --ingredients nor --meals, recipes are read interactively.
#[derive(Parser, Debug)]
struct Args {
    /// The catalog's SQLite file, created if missing.
    database: Option<PathBuf>,

    /// Provide ingredients separated by a comma.
    #[arg(long)]
    ingredients: Option<String>,

    /// Provide meals separated by a comma.
    #[arg(long)]
    meals: Option<String>,

    /// Log what is being stored and queried.
    #[arg(short, long)]
    verbose: bool,
}

/// Rewrites the two-character `-i1` and `-m1` spellings, which clap can't express as short
/// flags, into their long forms.
fn expand_legacy_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(s) = arg.to_str() else {
                return arg;
            };
            for (short, long) in [("-i1", "--ingredients"), ("-m1", "--meals")] {
                if s == short {
                    return long.into();
                }
                if let Some(value) = s.strip_prefix(short).and_then(|v| v.strip_prefix('=')) {
                    return format!("{long}={value}").into();
                }
            }
            arg
        })
        .collect()
}

/// This is where the catalog lives when no path is given. On Linux it should be like:
/// `~/.local/share/food_blog/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("food_blog");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .env()
        .init()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse_from(expand_legacy_flags(std::env::args_os()));
    init_logging(args.verbose)?;

    let path = match &args.database {
        Some(path) => path.clone(),
        None => data_path()?.join("food_blog.db"),
    };
    let mut conn = database::establish_connection(path)?;
    run(&mut conn, &args, io::stdin().lock(), io::stdout().lock())
}

/// Proposes recipes when both lists are given, reads new recipes when neither is, and otherwise
/// reports what is missing.
fn run(
    conn: &mut database::Connection,
    args: &Args,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    let request =
        match propose::ProposalRequest::from_args(args.ingredients.as_deref(), args.meals.as_deref())
        {
            Ok(request) => request,
            Err(e) => {
                writeln!(output, "{e}")?;
                return Ok(());
            }
        };

    match request {
        Some(request) => writeln!(output, "{}", propose::propose(conn, &request)?)?,
        None => collect::Session::new(conn, input, output)?.run()?,
    }
    Ok(())
}

#[cfg(test)]
fn run_with(conn: &mut database::Connection, args: &[&str], input: &str) -> String {
    let argv = std::iter::once("food-blog")
        .chain(args.iter().copied())
        .map(OsString::from);
    let args = Args::parse_from(expand_legacy_flags(argv));
    let mut output = vec![];
    run(conn, &args, io::Cursor::new(input), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

#[cfg(test)]
fn recipe_count(conn: &mut database::Connection) -> i64 {
    use diesel::{QueryDsl as _, RunQueryDsl as _};

    database::schema::recipes::table
        .count()
        .get_result(conn)
        .unwrap()
}

#[test]
fn half_a_request_is_reported() {
    let mut conn = database::test_connection();
    let recipe = "pancakes\nfry them\n1\n1 cup milk\n\n";

    let output = run_with(&mut conn, &[":memory:", "--meals", "lunch"], recipe);
    assert_eq!(output, "Provide ingredients.\n");

    let output = run_with(&mut conn, &[":memory:", "-i1", "milk"], recipe);
    assert_eq!(output, "Provide meals.\n");

    assert_eq!(recipe_count(&mut conn), 0);
}

#[test]
fn badly_formatted_lists_are_reported() {
    let mut conn = database::test_connection();

    let output = run_with(
        &mut conn,
        &[":memory:", "--ingredients", "milk sugar", "--meals", "lunch"],
        "",
    );
    assert_eq!(output, "Provide ingredients separated by a comma.\n");

    let output = run_with(
        &mut conn,
        &[":memory:", "--ingredients", "milk", "--meals", "lunch supper"],
        "",
    );
    assert_eq!(output, "Provide meals separated by a comma.\n");
}

#[test]
fn both_lists_print_the_proposal() {
    use crate::catalog::{add_recipe, record_quantity, RecipeDraft};
    use crate::database::models::Meal;
    use crate::resolve::ResolvedLine;

    let mut conn = database::test_connection();
    let draft = RecipeDraft {
        name: "pancakes".into(),
        description: "Fry them.".into(),
    };
    let id = add_recipe(&mut conn, &draft, &[Meal::Breakfast]).unwrap();
    let line = ResolvedLine {
        quantity: 1,
        measure: "cup".into(),
        ingredient: "strawberry".into(),
    };
    record_quantity(&mut conn, id, &line).unwrap();

    let output = run_with(
        &mut conn,
        &[":memory:", "--ingredients", "strawberry", "--meals", "breakfast,brunch"],
        "risotto\nstir\n4\n\n",
    );
    assert_eq!(output, "Recipes selected for you: pancakes\n");

    let output = run_with(
        &mut conn,
        &[":memory:", "--ingredients", "sugar", "--meals", "breakfast,brunch"],
        "",
    );
    assert_eq!(output, "There are no such recipes in the database.\n");

    assert_eq!(recipe_count(&mut conn), 1);
}

#[test]
fn no_lists_reads_recipes() {
    let mut conn = database::test_connection();

    let output = run_with(&mut conn, &[":memory:"], "soup\nboil\n3\n\n\n");
    assert!(output.starts_with("Pass the empty recipe name to exit.\nRecipe name:"));
    assert_eq!(recipe_count(&mut conn), 1);
}

#[test]
fn legacy_flags() {
    let expanded = expand_legacy_flags(
        ["food-blog", "food_blog.db", "-i1", "milk,sugar", "-m1=lunch", "--meals", "x"]
            .map(OsString::from),
    );
    assert_eq!(
        expanded,
        ["food-blog", "food_blog.db", "--ingredients", "milk,sugar", "--meals=lunch", "--meals", "x"]
            .map(OsString::from)
    );

    let args = Args::parse_from(expand_legacy_flags(
        ["food-blog", "catalog.db", "-i1", "milk", "-m1", "supper"].map(OsString::from),
    ));
    assert_eq!(args.database, Some(PathBuf::from("catalog.db")));
    assert_eq!(args.ingredients.as_deref(), Some("milk"));
    assert_eq!(args.meals.as_deref(), Some("supper"));
    assert!(!args.verbose);
}

#[test]
fn flags_are_optional() {
    let args = Args::parse_from(["food-blog", ":memory:"]);
    assert_eq!(args.database, Some(PathBuf::from(":memory:")));
    assert_eq!(args.ingredients, None);
    assert_eq!(args.meals, None);
}
