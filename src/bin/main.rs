use annotator_core::core::filter::ReverseFilter;
use annotator_core::core::glyph::Glyph;
use annotator_core::core::views::Views;
use annotator_core::persistence::{load_corpus_json, save_corpus_json};
use annotator_core::{
    Action, AnnotatorConfig, AnnotatorEngine, AnnotatorError, CorpusStore, Direction, EntityClass,
    MemoryStore, Mode, Result,
};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use std::sync::Arc;

const CONFIG_PATH: &str = "annotator.json";
const MAX_ROWS: usize = 12;

const HELP: &str = "\
  v <glyph>|-      toggle / clear vowel filter     c <glyph>|-   consonant filter
  rev present|absent|either                        partial | exclusive
  n <size>         n-gram size                     mode g|n
  dir <glyph|grapheme|word|context> <left|right|off>
  g <glyph>        select grapheme                 ng <g,g,..>   select n-gram
  w <id>           select word                     ctx <id>      select context
  sound <glyph> <text>   mean <word> <text>   text <ctx> <text>
  t <glyph>..      type glyphs   /  end word   bs  backspace   img <asset>|-
  draw <upper> <lower> [line]   type a glyph from its two halves (0b.. or decimal)
  submit   save   exit";

enum Flow {
    Continue,
    Exit,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = AnnotatorConfig::load_or_default(Path::new(CONFIG_PATH))?;
    let mut engine = AnnotatorEngine::from_config(&config);

    let mut store = match &config.corpus_path {
        Some(path) if path.exists() => MemoryStore::from_corpus(load_corpus_json(path)?),
        _ => MemoryStore::new(),
    };
    engine.set_corpus(Arc::new(store.snapshot()));
    let mut seen_revision = store.revision();

    let mut message = String::from("Type 'help' for commands.");
    loop {
        print_ui(&mut engine, &message)?;

        let mut input = String::new();
        if stdin().read_line(&mut input).map_err(io_err)? == 0 {
            break;
        }
        message = match handle_line(input.trim(), &mut engine, &mut store) {
            Ok((Flow::Exit, _)) => break,
            Ok((Flow::Continue, note)) => note,
            Err(e) => format!("{}", e).red().to_string(),
        };
        if store.revision() != seen_revision {
            seen_revision = store.revision();
            engine.set_corpus(Arc::new(store.snapshot()));
        }
    }

    println!("\nSaving session...");
    engine.save_snapshot()?;
    if let Some(path) = &config.corpus_path {
        save_corpus_json(store.corpus(), path)?;
        println!("Corpus saved to '{}'", path.display());
    }
    Ok(())
}

fn io_err(e: std::io::Error) -> AnnotatorError {
    AnnotatorError::Persistence(e.into())
}

fn parse_glyphs(args: &[&str]) -> Result<Vec<Glyph>> {
    args.iter()
        .flat_map(|a| a.split(','))
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Glyph>().map_err(AnnotatorError::from))
        .collect()
}

fn parse_id(arg: Option<&&str>) -> Result<u64> {
    arg.and_then(|s| s.parse().ok())
        .ok_or_else(|| AnnotatorError::Command("expected a numeric id".into()))
}

fn optional_glyph(arg: Option<&&str>) -> Result<Option<Glyph>> {
    match arg {
        None | Some(&"-") => Ok(None),
        Some(s) => Ok(Some(s.parse()?)),
    }
}

fn parse_half(arg: Option<&&str>) -> Result<u16> {
    let parsed = match arg.copied() {
        Some(s) => match s.strip_prefix("0b") {
            Some(bits) => u16::from_str_radix(bits, 2).ok(),
            None => s.parse().ok(),
        },
        None => None,
    };
    match parsed {
        Some(half) if half <= 0b111111 => Ok(half),
        _ => Err(AnnotatorError::Command("expected a six-stroke half, 0..=63".into())),
    }
}

fn parse_class(arg: Option<&&str>) -> Result<EntityClass> {
    match arg.copied() {
        Some("glyph") => Ok(EntityClass::Glyph),
        Some("grapheme") => Ok(EntityClass::Grapheme),
        Some("word") => Ok(EntityClass::Word),
        Some("context") => Ok(EntityClass::Context),
        _ => Err(AnnotatorError::Command("expected glyph|grapheme|word|context".into())),
    }
}

fn parse_direction(arg: Option<&&str>) -> Result<Direction> {
    match arg.copied() {
        Some("left") => Ok(Direction::Left),
        Some("right") => Ok(Direction::Right),
        Some("off") => Ok(Direction::Off),
        _ => Err(AnnotatorError::Command("expected left|right|off".into())),
    }
}

fn handle_line(
    line: &str,
    engine: &mut AnnotatorEngine,
    store: &mut MemoryStore,
) -> Result<(Flow, String)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");
    let rest = |from: usize| parts.get(from..).unwrap_or(&[]).join(" ");

    let note = match command {
        "" => String::new(),
        "exit" => return Ok((Flow::Exit, String::new())),
        "help" => HELP.to_string(),
        "v" => {
            match optional_glyph(parts.get(1))? {
                Some(g) => engine.dispatch(Action::ToggleVowelFilter(g)),
                None => engine.dispatch(Action::SetVowelFilter(None)),
            }
            String::new()
        }
        "c" => {
            match optional_glyph(parts.get(1))? {
                Some(g) => engine.dispatch(Action::ToggleConsonantFilter(g)),
                None => engine.dispatch(Action::SetConsonantFilter(None)),
            }
            String::new()
        }
        "rev" => {
            let filter = match parts.get(1).copied() {
                Some("present") => ReverseFilter::Present,
                Some("absent") => ReverseFilter::Absent,
                _ => ReverseFilter::Either,
            };
            engine.dispatch(Action::SetReverseFilter(filter));
            String::new()
        }
        "partial" => {
            engine.dispatch(Action::TogglePartial);
            String::new()
        }
        "exclusive" => {
            engine.dispatch(Action::ToggleExclusive);
            String::new()
        }
        "n" => {
            engine.dispatch(Action::SetN(parse_id(parts.get(1))? as usize));
            String::new()
        }
        "mode" => {
            let mode = if parts.get(1).copied() == Some("n") { Mode::NGrams } else { Mode::Graphemes };
            engine.dispatch(Action::SetMode(mode));
            String::new()
        }
        "dir" => {
            let class = parse_class(parts.get(1))?;
            let direction = parse_direction(parts.get(2))?;
            engine.dispatch(Action::SetDirection(class, direction));
            String::new()
        }
        "g" => {
            let glyph = optional_glyph(parts.get(1))?
                .ok_or_else(|| AnnotatorError::Command("expected a glyph".into()))?;
            engine.dispatch(Action::ToggleGrapheme(glyph));
            String::new()
        }
        "ng" => {
            engine.dispatch(Action::ToggleNGram(parse_glyphs(&parts[1..])?));
            String::new()
        }
        "w" => {
            engine.dispatch(Action::ToggleWord(parse_id(parts.get(1))?));
            String::new()
        }
        "ctx" => {
            engine.dispatch(Action::ToggleContext(parse_id(parts.get(1))?));
            String::new()
        }
        "sound" => {
            let glyph = optional_glyph(parts.get(1))?
                .ok_or_else(|| AnnotatorError::Command("expected a glyph".into()))?;
            let g = store.update_grapheme(glyph, &rest(2))?;
            format!("{} now sounds like '{}'", g.id, g.sound)
        }
        "mean" => {
            let w = store.update_word(parse_id(parts.get(1))?, &rest(2))?;
            format!("word {} now means '{}'", w.id, w.meaning)
        }
        "text" => {
            let c = store.update_context(parse_id(parts.get(1))?, &rest(2))?;
            format!("context {} text updated", c.id)
        }
        "t" => {
            for glyph in parse_glyphs(&parts[1..])? {
                engine.entry.push_glyph(glyph);
            }
            String::new()
        }
        "draw" => {
            let upper = parse_half(parts.get(1))?;
            let lower = parse_half(parts.get(2))?;
            let glyph = Glyph::combine_halves(upper, lower, parts.get(3) == Some(&"line"));
            engine.entry.push_glyph(glyph);
            format!(
                "drew {} (upper {:06b}, lower {:06b})",
                glyph,
                glyph.upper_half(),
                glyph.lower_half()
            )
        }
        "/" => {
            engine.entry.finish_word();
            String::new()
        }
        "bs" => {
            engine.entry.backspace();
            String::new()
        }
        "img" => {
            let image = parts.get(1).filter(|s| **s != "-").map(|s| s.to_string());
            engine.entry.set_image(image);
            String::new()
        }
        "submit" => {
            let added = engine.entry.submit(store)?;
            format!("Submitted {} words", added.len())
        }
        "save" => {
            engine.save_snapshot()?;
            "Session saved".to_string()
        }
        other => return Err(AnnotatorError::Command(format!("unknown command '{}'", other))),
    };
    Ok((Flow::Continue, note))
}

fn print_ui(engine: &mut AnnotatorEngine, message: &str) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0)).map_err(io_err)?;

    println!("{}", "Trunic Annotator".bold());
    println!("---------------------------------------------------------------");
    let state = engine.state.clone();
    let dir = |class: EntityClass| format!("{:?}", state.direction(class)).to_lowercase();
    println!(
        "Directions: glyph={} grapheme={} word={} context={}",
        dir(EntityClass::Glyph),
        dir(EntityClass::Grapheme),
        dir(EntityClass::Word),
        dir(EntityClass::Context)
    );
    if state.filter.is_active() {
        println!(
            "Filter: vowel={:?} consonant={:?} reverse={:?} partial={} exclusive={} | mode={:?} n={}",
            state.filter.vowel.map(|g| g.bits()),
            state.filter.consonant.map(|g| g.bits()),
            state.filter.reverse,
            state.filter.partial,
            state.filter.exclusive,
            state.mode,
            state.n
        );
    } else {
        println!("Filter: none | mode={:?} n={}", state.mode, state.n);
    }

    let views: Views = engine.views();
    let corpus = engine.corpus().clone();

    println!("\n{}", "Vowel parts".cyan());
    println!("  {}", join(views.vowel_glyphs.iter().map(|g| g.to_string())));
    println!("{}", "Consonant parts".cyan());
    println!("  {}", join(views.consonant_glyphs.iter().map(|g| g.to_string())));

    match state.mode {
        Mode::Graphemes => {
            println!("{}", "Graphemes".cyan());
            for g in views.graphemes.iter().take(MAX_ROWS) {
                let marker = if state.selected_grapheme == Some(g.id) { "*" } else { " " };
                println!(" {}{:>5}  {}", marker, g.id, corpus.sound_guess(g.id));
            }
        }
        Mode::NGrams => {
            println!("{}", "N-grams".cyan());
            for ng in views.ngrams.iter().take(MAX_ROWS) {
                let marker = if state.selected_ngram.as_deref() == Some(&ng.glyphs[..]) { "*" } else { " " };
                println!(
                    " {}{} x{}  {}",
                    marker,
                    join(ng.glyphs.iter().map(|g| g.to_string())),
                    ng.count,
                    corpus.glyphs_translation(&ng.glyphs)
                );
            }
        }
    }

    println!("{}", "Words".cyan());
    for w in views.words.iter().take(MAX_ROWS) {
        let marker = if state.selected_word == Some(w.id) { "*" } else { " " };
        println!(" {}{:>4}  [{}]  {}", marker, w.id, w.key(), corpus.word_translation(w));
    }

    println!("{}", "Contexts".cyan());
    for c in views.contexts.iter().take(MAX_ROWS) {
        let marker = if state.selected_context == Some(c.id) { "*" } else { " " };
        println!(
            " {}{:>4}  {}  {}",
            marker,
            c.id,
            c.image.as_deref().unwrap_or("(no image)"),
            corpus.context_translation(c.id)
        );
    }

    println!("\n{}", "Entry".cyan());
    println!(
        "  text: {} | typing: [{}] | image: {}",
        engine.entry.translation(&corpus),
        join(engine.entry.current_word().iter().map(|g| g.to_string())),
        engine.entry.image().unwrap_or("-")
    );

    if !message.is_empty() {
        println!("\n{}", message);
    }
    print!("\n> ");
    out.flush().map_err(io_err)?;
    Ok(())
}

fn join<I: Iterator<Item = String>>(items: I) -> String {
    items.collect::<Vec<_>>().join(" ")
}
