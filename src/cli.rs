use crate::libpanel::api::Transport;
use crate::libpanel::model::Entity;
use crate::libpanel::prompt::{Notice, NoticeLevel, Prompter};
use crate::libpanel::sync::{Action, AdminPanel, CollectionView, SectionKind};
use colored::Colorize;
use log::debug;
use std::io::{self, BufRead, Write};
use text_io::try_read;

/// Typed at any prompt to abandon the current flow.
pub const CANCEL: &str = ":q";
/// Ends a multi-line block.
pub const END_OF_BLOCK: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tests,
    News,
    Content,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Switch(Tab),
    Refresh,
    Add,
    Open(usize),
    Quit,
    Unknown,
}

impl Command {
    pub fn from_str(input: &str) -> Command {
        match input.trim() {
            "t" => Command::Switch(Tab::Tests),
            "n" => Command::Switch(Tab::News),
            "c" => Command::Switch(Tab::Content),
            "r" => Command::Refresh,
            "a" => Command::Add,
            "q" => Command::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if num > 0 => Command::Open(num - 1),
                _ => Command::Unknown,
            },
        }
    }
}

fn flush() {
    let _ = io::stdout().flush();
}

/// `try_read!` yields an empty string both for a blank line and for a closed
/// stream, so end of input has to be checked on the buffer first.
fn at_eof(reader: &mut impl BufRead) -> bool {
    reader.fill_buf().map_or(true, |buf| buf.is_empty())
}

fn read_line() -> Option<String> {
    flush();
    if at_eof(&mut io::stdin().lock()) {
        debug!("[Cli] End of input");
        return None;
    }
    let line: Result<String, _> = try_read!("{}\n");
    line.ok().map(|l| l.trim_end_matches('\r').to_string())
}

pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Reads lines until a lone `.`.
    pub fn read_block(&mut self, label: &str) -> Option<String> {
        println!(
            "{} {}",
            label.cyan(),
            format!("(finish with a line containing only `{END_OF_BLOCK}`, {CANCEL} to cancel)").dimmed()
        );
        let mut lines = Vec::new();
        loop {
            let line = read_line()?;
            match line.as_str() {
                END_OF_BLOCK => break,
                CANCEL => return None,
                _ => lines.push(line),
            }
        }
        Some(lines.join("\n"))
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str, default: &str) -> Option<String> {
        if default.is_empty() {
            print!("{} ", label.cyan());
        } else {
            print!("{} {} ", label.cyan(), format!("[{default}]").dimmed());
        }
        let input = read_line()?;
        debug!("input: {:?}", input);
        match input.as_str() {
            CANCEL => None,
            "" => Some(default.to_string()),
            other => Some(other.to_string()),
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        println!("{}", message.yellow());
        print!("{} ", "(y/n)".cyan());
        matches!(
            read_line().as_deref().map(str::trim),
            Some("y" | "Y" | "yes" | "д" | "да")
        )
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", format!("✅ {}", notice.message).bright_green()),
            NoticeLevel::Error => println!("{}", format!("❌ {}", notice.message).bright_red()),
            NoticeLevel::Info => println!("{}", notice.message.yellow()),
        }
    }
}

fn print_list<E: Entity>(view: &CollectionView<E>) {
    println!(
        "{}",
        format!("==========> {} ({}) <==========", E::KIND, view.cards().len()).cyan()
    );
    if let Some(message) = view.empty_message() {
        println!("{}", message.yellow());
        return;
    }
    for (idx, card) in view.cards().iter().enumerate() {
        println!(
            "{}. {}  {}",
            format!("{}", idx + 1).bold(),
            card.title().black().bold().on_white(),
            card.stats().dimmed()
        );
    }
}

fn print_content<T: Transport>(panel: &AdminPanel<T>) {
    println!("{}", "==========> content <==========".cyan());
    for (key, kind) in [("a", SectionKind::About), ("t", SectionKind::Theory)] {
        let section = panel.content().section(kind);
        println!("{} {}", format!("[{key}]").bold(), section.title.black().bold().on_white());
        println!("{}", section.content);
    }
    if let Some(err) = panel.content().error() {
        println!("{}", format!("Last save failed: {err}").bright_red());
    }
}

fn print_help(tab: Tab) {
    let specific = match tab {
        Tab::Content => "at/ac/tt/tc edit a field, s save",
        _ => "a add, <number> open",
    };
    println!(
        "{}",
        format!("t tests, n news, c content, r refresh, {specific}, q quit").dimmed()
    );
}

fn action_key(action: Action) -> &'static str {
    match action {
        Action::Save => "s",
        Action::Delete => "d",
        Action::Copy => "j",
        Action::AddQuestion => "+",
        Action::AddMultipleQuestions => "m",
        Action::Duplicate => "u",
    }
}

/// Card screen for one entity. Returns when the user goes back or the card is gone.
fn card_loop<T: Transport>(
    panel: &mut AdminPanel<T>,
    tab: Tab,
    index: usize,
    prompter: &mut TerminalPrompter,
) {
    loop {
        let (buffer, actions, id, state) = match tab {
            Tab::Tests => match panel.tests().card(index) {
                Some(card) => (card.buffer().to_string(), card.actions(), card.id().to_string(), card.state()),
                None => return,
            },
            Tab::News => match panel.news().card(index) {
                Some(card) => (card.buffer().to_string(), card.actions(), card.id().to_string(), card.state()),
                None => return,
            },
            Tab::Content => return,
        };
        debug!("[Cli] Card {} is {:?}", id, state);

        println!("{}", buffer);
        let keys: Vec<String> = actions
            .iter()
            .map(|a| format!("{} {}", action_key(*a), a.label()))
            .collect();
        println!("{}", format!("e edit, {}, b back", keys.join(", ")).dimmed());
        print!("{} ", ">".cyan());
        let Some(input) = read_line() else { return };

        match input.trim() {
            "b" => return,
            "e" => {
                if let Some(text) = prompter.read_block("New JSON:") {
                    match tab {
                        Tab::Tests => {
                            if let Some(card) = panel.tests_mut().card_mut(index) {
                                card.edit(text);
                            }
                        }
                        _ => {
                            if let Some(card) = panel.news_mut().card_mut(index) {
                                card.edit(text);
                            }
                        }
                    }
                }
            }
            "s" => {
                let saved = match tab {
                    Tab::Tests => panel.save_test(index, prompter),
                    _ => panel.save_news(index, prompter),
                };
                if saved {
                    return;
                }
            }
            "d" => {
                let deleted = match tab {
                    Tab::Tests => panel.delete_test(index, prompter),
                    _ => panel.delete_news(index, prompter),
                };
                if deleted {
                    return;
                }
            }
            "j" => {
                let copied = match tab {
                    Tab::Tests => panel.tests().copy(index),
                    _ => panel.news().copy(index),
                };
                if let Some(text) = copied {
                    println!("{}", text);
                }
            }
            "+" if tab == Tab::Tests => {
                panel.add_question(&id, prompter);
            }
            "m" if tab == Tab::Tests => {
                panel.add_multiple_questions(&id, prompter);
            }
            "u" if tab == Tab::Tests => {
                panel.duplicate_test(&id, prompter);
            }
            other => println!("{}", format!("Unknown action {other:?}").bright_red()),
        }
    }
}

fn edit_content<T: Transport>(panel: &mut AdminPanel<T>, field: &str, prompter: &mut TerminalPrompter) {
    let kind = if field.starts_with('a') {
        SectionKind::About
    } else {
        SectionKind::Theory
    };
    if field.ends_with('t') {
        let current = panel.content().section(kind).title.clone();
        if let Some(title) = prompter.ask("Title:", &current) {
            panel.content_mut().section_mut(kind).title = title;
        }
    } else if let Some(text) = prompter.read_block("Content (Markdown allowed):") {
        panel.content_mut().section_mut(kind).content = text;
    }
}

fn load<T: Transport>(panel: &mut AdminPanel<T>, tab: Tab, prompter: &mut TerminalPrompter) {
    match tab {
        Tab::Tests => panel.load_tests(prompter),
        Tab::News => panel.load_news(prompter),
        Tab::Content => panel.load_content(prompter),
    }
}

pub fn cli_loop<T: Transport>(panel: &mut AdminPanel<T>, prompter: &mut TerminalPrompter) {
    let mut tab = Tab::Tests;
    load(panel, tab, prompter);

    loop {
        match tab {
            Tab::Tests => print_list(panel.tests()),
            Tab::News => print_list(panel.news()),
            Tab::Content => print_content(panel),
        }
        print_help(tab);
        print!("{} ", ">".cyan());
        let Some(input) = read_line() else {
            return;
        };

        if tab == Tab::Content {
            match input.trim() {
                field @ ("at" | "ac" | "tt" | "tc") => {
                    edit_content(panel, field, prompter);
                    continue;
                }
                "s" => {
                    panel.save_content(prompter);
                    continue;
                }
                _ => {}
            }
        }

        match Command::from_str(&input) {
            Command::Switch(next) => {
                tab = next;
                load(panel, tab, prompter);
            }
            Command::Refresh => load(panel, tab, prompter),
            Command::Add => match tab {
                Tab::Tests => {
                    panel.create_test(prompter);
                }
                Tab::News => {
                    panel.create_news(prompter);
                }
                Tab::Content => {}
            },
            Command::Open(index) => card_loop(panel, tab, index, prompter),
            Command::Quit => {
                println!("{}", "Bye!".cyan());
                return;
            }
            Command::Unknown => println!("{}", "Unknown command".bright_red()),
        }
    }
}
