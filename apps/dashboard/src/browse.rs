//! Interactive loop that feeds typed lines into a [`DashboardSession`].

use anyhow::Result;
use client_core::{CommandEffect, DashboardCommand, DashboardSession, FetchOutcome};
use shared::domain::{FilterField, RecordId, KNOWN_REGIONS};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::render::render_dashboard;

pub const HELP: &str = "\
commands:
  filter <name|role|region|skills> [value]   edit a filter (empty value clears it)
  search                                     apply filters from page 1
  clear                                      reset filters and reload page 1
  next | prev | page <n>                     move between pages
  size <n>                                   change page size
  expand <id>                                show or hide deals/clients for a row
  ask <question>                             ask the AI assistant
  refresh | show | regions | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Command(DashboardCommand),
    Show,
    Regions,
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<BrowseInput, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => return Ok(BrowseInput::Empty),
        "quit" | "exit" | "q" => return Ok(BrowseInput::Quit),
        "help" | "?" => return Ok(BrowseInput::Help),
        "show" => return Ok(BrowseInput::Show),
        "regions" => return Ok(BrowseInput::Regions),
        "filter" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            let field = FilterField::parse(field)
                .ok_or_else(|| format!("unknown filter field '{field}'"))?;
            DashboardCommand::EditFilter {
                field,
                value: value.to_string(),
            }
        }
        "search" => DashboardCommand::SubmitSearch,
        "clear" => DashboardCommand::ClearSearch,
        "refresh" => DashboardCommand::Refresh,
        "next" => DashboardCommand::NextPage,
        "prev" => DashboardCommand::PrevPage,
        "page" => DashboardCommand::GoToPage(parse_number(rest, "page")?),
        "size" => {
            let size: u32 = parse_number(rest, "page size")?;
            if size == 0 {
                return Err("page size must be at least 1".to_string());
            }
            DashboardCommand::SetPageSize(size)
        }
        "expand" => DashboardCommand::ToggleRow(RecordId(parse_number(rest, "row id")?)),
        "ask" => DashboardCommand::Ask(rest.to_string()),
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(BrowseInput::Command(command))
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("expected a number for {what}, got '{raw}'"))
}

pub async fn run<R, W>(session: &DashboardSession, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    session.dispatch(DashboardCommand::Refresh).await;
    write_block(&mut output, &render_dashboard(&session.snapshot().await)).await?;
    write_block(&mut output, "type 'help' for commands").await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(BrowseInput::Quit) => break,
            Ok(BrowseInput::Empty) => continue,
            Ok(BrowseInput::Help) => {
                write_block(&mut output, HELP).await?;
                continue;
            }
            Ok(BrowseInput::Regions) => {
                write_block(&mut output, &KNOWN_REGIONS.join("\n")).await?;
                continue;
            }
            Ok(BrowseInput::Show) => None,
            Ok(BrowseInput::Command(command)) => Some(command),
            Err(message) => {
                write_block(&mut output, &message).await?;
                continue;
            }
        };

        if let Some(command) = command {
            match session.dispatch(command).await {
                CommandEffect::FilterEdited => continue,
                CommandEffect::List(FetchOutcome::Blocked) => {
                    write_block(&mut output, "no page in that direction").await?;
                    continue;
                }
                _ => {}
            }
        }
        write_block(&mut output, &render_dashboard(&session.snapshot().await)).await?;
    }
    Ok(())
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.trim_end().as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
