//! Interactive browsing: a menu loop driving the browse state machine

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Select};
use roster_service::{directory::SortField, handlers::ListResponse};

use super::{spinner, ClientOptions};
use crate::api::ListingSource;
use crate::browser::{Browser, Fetched};
use crate::pager::{window, BrowseState, Transition, MAX_VISIBLE_PAGES};
use crate::render;

/// Page sizes offered by the browser
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 25, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Go(Transition),
    ChangePageSize,
    Retry,
    Quit,
}

pub async fn execute(options: &ClientOptions, size: u32) -> Result<()> {
    let source = Arc::new(options.source()?);
    let mut browser = Browser::new(source, BrowseState::new(1, size, None)?);
    let theme = ColorfulTheme::default();

    println!("\n{}\n", "Roster directory".bold().cyan());
    browser.refresh();

    let mut current: Option<ListResponse> = None;
    loop {
        if let Some(fetched) = settle(&mut browser).await {
            current = show(fetched);
        }

        let state = browser.state();
        let choices = actions(&state, current.as_ref());
        let labels: Vec<&str> = choices.iter().map(|(label, _)| label.as_str()).collect();

        let picked = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        let transition = match choices[picked].1 {
            Action::Quit => break,
            Action::Retry => {
                browser.refresh();
                continue;
            }
            Action::Go(transition) => transition,
            Action::ChangePageSize => {
                let sizes: Vec<String> = PAGE_SIZE_OPTIONS.iter().map(u32::to_string).collect();
                let default = PAGE_SIZE_OPTIONS
                    .iter()
                    .position(|&s| s == state.size())
                    .unwrap_or(1);
                let idx = Select::with_theme(&theme)
                    .with_prompt("Users per page")
                    .items(&sizes)
                    .default(default)
                    .interact()?;
                Transition::PageSizeChanged(PAGE_SIZE_OPTIONS[idx])
            }
        };

        if let Err(e) = browser.dispatch(transition) {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
    }

    Ok(())
}

async fn settle<S: ListingSource>(browser: &mut Browser<S>) -> Option<Fetched> {
    if !browser.is_loading() {
        return None;
    }
    let pb = spinner("Loading users...");
    let fetched = browser.settle().await;
    pb.finish_and_clear();
    fetched
}

/// Print a finished fetch; a failed fetch leaves nothing on screen to act on
fn show(fetched: Fetched) -> Option<ListResponse> {
    match fetched.result {
        Ok(response) => {
            print!("{}", render::page(&fetched.state, &response));
            Some(response)
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            None
        }
    }
}

/// Menu entries available for `state` given the last page shown
fn actions(state: &BrowseState, current: Option<&ListResponse>) -> Vec<(String, Action)> {
    let mut choices = Vec::new();

    match current {
        Some(response) => {
            let paging = &response.paging;
            if paging.next.is_some() {
                choices.push((
                    "Next page".to_string(),
                    Action::Go(Transition::PageChanged(state.page() + 1)),
                ));
            }
            if paging.previous.is_some() {
                choices.push((
                    "Previous page".to_string(),
                    Action::Go(Transition::PageChanged(state.page().saturating_sub(1))),
                ));
            }
            for n in window(
                state.page(),
                paging.total_results as u64,
                state.size(),
                MAX_VISIBLE_PAGES,
            ) {
                if n != state.page() {
                    choices.push((
                        format!("Go to page {n}"),
                        Action::Go(Transition::PageChanged(n)),
                    ));
                }
            }
        }
        None => choices.push(("Retry".to_string(), Action::Retry)),
    }

    for field in SortField::ALL {
        let label = if state.sort() == Some(field) {
            format!("Sort by {field} (clear)")
        } else {
            format!("Sort by {field}")
        };
        choices.push((label, Action::Go(Transition::SortClicked(field))));
    }
    if state.sort().is_some() {
        choices.push(("Reset order".to_string(), Action::Go(Transition::SortReset)));
    }
    choices.push(("Change page size".to_string(), Action::ChangePageSize));
    choices.push(("Quit".to_string(), Action::Quit));

    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_service::directory::{PagingLinks, Record};

    fn response(total: usize, previous: bool, next: bool) -> ListResponse {
        ListResponse {
            data: vec![Record::new(0, "Jorn")],
            paging: PagingLinks {
                total_results: total,
                previous: previous.then(|| "prev".to_string()),
                next: next.then(|| "next".to_string()),
            },
        }
    }

    fn labels(choices: &[(String, Action)]) -> Vec<&str> {
        choices.iter().map(|(l, _)| l.as_str()).collect()
    }

    #[test]
    fn test_first_page_actions() {
        let state = BrowseState::default();
        let choices = actions(&state, Some(&response(50, false, true)));

        assert_eq!(
            labels(&choices),
            [
                "Next page",
                "Go to page 2",
                "Go to page 3",
                "Go to page 4",
                "Go to page 5",
                "Sort by name",
                "Sort by id",
                "Change page size",
                "Quit",
            ]
        );
        assert_eq!(choices[0].1, Action::Go(Transition::PageChanged(2)));
    }

    #[test]
    fn test_sorted_middle_page_actions() {
        let state = BrowseState::new(3, 10, Some(SortField::Name)).unwrap();
        let choices = actions(&state, Some(&response(50, true, true)));
        let labels = labels(&choices);

        assert!(labels.contains(&"Previous page"));
        assert!(labels.contains(&"Sort by name (clear)"));
        assert!(labels.contains(&"Reset order"));
        assert!(!labels.contains(&"Go to page 3"));
    }

    #[test]
    fn test_failed_fetch_offers_retry() {
        let choices = actions(&BrowseState::default(), None);
        assert_eq!(choices[0], ("Retry".to_string(), Action::Retry));
        assert!(!labels(&choices).contains(&"Next page"));
    }

    #[test]
    fn test_page_size_options_are_valid_sizes() {
        let state = BrowseState::new(4, 10, None).unwrap();
        for size in PAGE_SIZE_OPTIONS {
            let next = state.apply(Transition::PageSizeChanged(size)).unwrap();
            assert_eq!(next.page(), 1);
        }
    }
}
