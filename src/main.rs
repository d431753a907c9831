// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caravel CLI entrypoint.
//!
//! By default this connects to the datastore and AI endpoint named by the
//! `CARAVEL_*` environment variables and runs the interactive TUI.
//!
//! Use `--demo` to run against a built-in in-memory catalog and a canned AI
//! backend instead (no network, no credentials).

use std::error::Error;
use std::sync::Arc;

use tokio::sync::Mutex;

use caravel::ai::{AiBackend, DemoAi, HttpAi};
use caravel::config::Config;
use caravel::query::DEFAULT_PAGE_SIZE;
use caravel::store::{HttpTourStore, MemoryTourStore, TourStore};
use caravel::ui::Notifications;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--demo]\n\nWithout flags the datastore and AI endpoint come from the environment:\n  CARAVEL_STORE_URL, CARAVEL_STORE_KEY, CARAVEL_AI_URL, CARAVEL_AI_KEY\n  (optional: CARAVEL_AI_MODEL, CARAVEL_PAGE_SIZE, CARAVEL_TUI_PALETTE)\n\n--demo runs against a built-in in-memory catalog and a canned AI backend;\nno network access or credentials are needed."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
}

fn parse_options(args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    for arg in args {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "caravel".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let (store, ai, page_size): (Arc<dyn TourStore>, Arc<dyn AiBackend>, usize) =
            if options.demo {
                (
                    Arc::new(MemoryTourStore::demo()),
                    Arc::new(DemoAi),
                    DEFAULT_PAGE_SIZE,
                )
            } else {
                let config = Config::from_env()?;
                let store = HttpTourStore::new(config.store_url(), config.store_key())?;
                let ai = HttpAi::new(config.ai_url(), config.ai_key(), config.ai_model())?;
                (Arc::new(store), Arc::new(ai), config.page_size())
            };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            let remote = caravel::remote::spawn(store, ai);
            let notices = Arc::new(Mutex::new(Notifications::new()));

            let tui_join = tokio::task::spawn_blocking(move || {
                caravel::tui::run(remote, notices, page_size).map_err(|err| err.to_string())
            })
            .await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("caravel: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse_options(["--demo".to_owned()].into_iter()).expect("parse options");
        assert!(options.demo);
    }

    #[test]
    fn rejects_duplicate_demo_flag() {
        parse_options(["--demo".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
        parse_options(["extra".to_owned()].into_iter()).unwrap_err();
    }
}
