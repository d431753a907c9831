// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, help, and filter helpers used by TUI rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTab {
    Basic,
    Json(JsonField),
}

impl EditTab {
    const ALL: [EditTab; 7] = [
        EditTab::Basic,
        EditTab::Json(JsonField::Content),
        EditTab::Json(JsonField::Logistics),
        EditTab::Json(JsonField::Itinerary),
        EditTab::Json(JsonField::Provisions),
        EditTab::Json(JsonField::Requirements),
        EditTab::Json(JsonField::Pricing),
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basics",
            Self::Json(field) => field.label(),
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    fn cycle(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let next = (self.index() as i32 + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }

    fn from_digit(ch: char) -> Option<Self> {
        let idx = ch.to_digit(10)? as usize;
        if idx == 0 {
            return None;
        }
        Self::ALL.get(idx - 1).copied()
    }
}

fn next_basic_field(field: BasicField) -> BasicField {
    let idx = BasicField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0);
    BasicField::ALL[(idx + 1) % BasicField::ALL.len()]
}

fn prev_basic_field(field: BasicField) -> BasicField {
    let idx = BasicField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0);
    BasicField::ALL[(idx + BasicField::ALL.len() - 1) % BasicField::ALL.len()]
}

fn browse_title(app: &App) -> Line<'static> {
    let page_count = app.query.last_page(app.total) + 1;
    let counter = format!("[{}/{}]", app.query.page() + 1, page_count);
    let sort = format!(
        "{} {}",
        app.query.sort().label(),
        app.query.direction().arrow()
    );

    let mut spans = vec![
        Span::raw("─ Tours ".to_owned()),
        Span::styled(counter, app.theme.key_style()),
        Span::raw(format!(" {} rows ", app.total)),
        Span::styled(format!("sort:{sort}"), app.theme.label_style()),
    ];
    if app.query.has_search() {
        spans.push(Span::raw(" ".to_owned()));
        spans.push(Span::styled(
            format!("search:{}", app.query.search()),
            app.theme.key_style(),
        ));
    }
    if !app.filter.text().trim().is_empty() {
        spans.push(Span::raw(" ".to_owned()));
        spans.push(Span::styled(
            format!("filter:{}", app.filter.text()),
            app.theme.key_style(),
        ));
    }
    if app.loading {
        spans.push(Span::styled(
            " loading… ".to_owned(),
            app.theme.placeholder_style(),
        ));
    } else {
        spans.push(Span::raw(" ".to_owned()));
    }
    Line::from(spans)
}

fn edit_title(draft: &EditDraft) -> String {
    let title = draft
        .line_input(BasicField::Title)
        .map(|input| input.text().trim().to_owned())
        .unwrap_or_default();
    if draft.is_create() {
        if title.is_empty() {
            "─ New tour ".to_owned()
        } else {
            format!("─ New tour · {title} ")
        }
    } else if title.is_empty() {
        "─ Edit tour ".to_owned()
    } else {
        format!("─ Edit tour · {title} ")
    }
}

fn tabs_line(app: &App) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    for (idx, tab) in EditTab::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" │ ".to_owned(), app.theme.label_style()));
        }
        let active = *tab == app.edit_tab;
        spans.push(Span::styled(format!("{}", idx + 1), app.theme.key_style()));
        spans.push(Span::styled(
            format!(" {}", tab.label()),
            app.theme.tab_style(active),
        ));
    }
    Line::from(spans)
}

fn format_created(created_at: Option<&str>) -> String {
    match created_at {
        Some(stamp) => stamp.split('T').next().unwrap_or(stamp).to_owned(),
        None => "—".to_owned(),
    }
}

fn tree_lines(editor: &FieldEditor, theme: &TuiTheme) -> Vec<Line<'static>> {
    render_tree(editor.document())
        .into_iter()
        .map(|row| {
            let mut spans = vec![Span::raw(" ".repeat(row.depth * INDENT_WIDTH))];
            if let Some(label) = row.label {
                spans.push(Span::styled(label, theme.label_style()));
                if !matches!(row.value, TreeValue::Branch) {
                    spans.push(Span::raw(": ".to_owned()));
                }
            }
            let text = row.value.display_text().to_owned();
            let style = match row.value {
                TreeValue::Badge(on) => theme.badge_style(on),
                ref value if value.is_placeholder() => theme.placeholder_style(),
                _ => theme.base_style(),
            };
            spans.push(Span::styled(text, style));
            Line::from(spans)
        })
        .collect()
}

fn raw_lines(editor: &FieldEditor, theme: &TuiTheme) -> Vec<Line<'static>> {
    (0..editor.raw().line_count())
        .map(|row| {
            let text = editor.raw().line(row).unwrap_or("").to_owned();
            Line::from(Span::styled(text, theme.base_style()))
        })
        .collect()
}

fn footer_input_line(prefix: &str, input: &LineInput, theme: &TuiTheme) -> Line<'static> {
    Line::from(vec![
        Span::styled(prefix.to_owned(), theme.key_style()),
        Span::raw(input.text().to_owned()),
    ])
}

fn footer_help_line(app: &App, toast: Option<&Toast>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let entries: &[(&str, &str)] = match app.screen {
        Screen::Browse => &[
            ("↑↓", "select"),
            ("/", "search"),
            ("\\", "filter"),
            ("s/S", "sort"),
            ("[]", "page"),
            ("⏎", "edit"),
            ("n", "new"),
            ("d", "dup"),
            ("x", "del"),
            ("y", "yank"),
            ("r", "reload"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Screen::Edit => &[
            ("Tab/1-7", "tabs"),
            ("⏎", "edit"),
            ("m", "mode"),
            ("g", "generate"),
            ("^S", "save"),
            ("Esc", "back"),
            ("?", "help"),
        ],
    };
    for (idx, (key, label)) in entries.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" | ".to_owned(), app.theme.label_style()));
        }
        spans.push(Span::styled((*key).to_owned(), app.theme.key_style()));
        spans.push(Span::styled(format!(" {label}"), app.theme.label_style()));
    }

    if let Some(toast) = toast {
        spans.push(Span::styled(" | ".to_owned(), app.theme.label_style()));
        spans.push(Span::styled(
            toast.message.clone(),
            app.theme.notice_style(toast.kind),
        ));
    }

    Line::from(spans)
}

fn footer_brand_line(theme: &TuiTheme) -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        theme.header_style(),
    )])
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(78, 84, main_area);
    frame.render_widget(Clear, area);

    let key_style = app.theme.key_style();
    let header_style = app.theme.header_style();
    let key_col_width = "Tab/Shift-Tab, 1-7".len();

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Catalog ---", header_style)));
    lines.push(help_kv(
        "↑/↓, Home/End",
        "move the selection",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "/",
        "server-side search (title, slug, destination)",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "\\",
        "fuzzy-filter the loaded page",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "s / S",
        "cycle sort column / flip direction",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "[ / ]",
        "previous / next page",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "Enter",
        "edit the selected tour",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("n", "create a tour", key_col_width, key_style));
    lines.push(help_kv(
        "d",
        "duplicate the selected tour",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "x",
        "delete the selected tour (asks first)",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "y",
        "yank the slug to the clipboard (OSC 52)",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "r",
        "reload the current page",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("q", "quit", key_col_width, key_style));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("--- Editor ---", header_style)));
    lines.push(help_kv(
        "Tab/Shift-Tab, 1-7",
        "switch tabs",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "↑/↓",
        "move between fields / scroll the document",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "Enter",
        "edit the focused field (cycles the tour type)",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "m",
        "toggle tree / raw JSON mode",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "Esc",
        "leave the input (raw edits commit on blur)",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv(
        "g",
        "generate the document from an AI prompt",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Ctrl-s", "save the tour", key_col_width, key_style));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Esc or ? closes this help.",
        app.theme.label_style(),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("─ Help ")
                .border_style(app.theme.panel_border_style(true)),
        );
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame<'_>, app: &App, main_area: Rect, title: &str) {
    let area = centered_rect(60, 20, main_area);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::raw(""),
        Line::from(Span::raw(format!("Delete \"{title}\"?"))),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y".to_owned(), app.theme.key_style()),
            Span::raw(" delete   ".to_owned()),
            Span::styled("n".to_owned(), app.theme.key_style()),
            Span::raw(" / ".to_owned()),
            Span::styled("Esc".to_owned(), app.theme.key_style()),
            Span::raw(" keep".to_owned()),
        ]),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .style(app.theme.base_style())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("─ Confirm ")
                .border_style(app.theme.error_style()),
        );
    frame.render_widget(paragraph, area);
}

/// Ranks the loaded page against the filter needle. An empty needle keeps
/// every row in page order; otherwise rows survive when the needle is a
/// subsequence of title+slug+destination or scores past a fuzzy-ratio
/// cutoff, best matches first.
fn filter_row_indices(rows: &[Tour], needle: &str) -> Vec<usize> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return (0..rows.len()).collect();
    }

    let mut ranked: Vec<(i64, usize)> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, tour)| {
            let haystack = format!(
                "{} {} {}",
                tour.fields().title(),
                tour.fields().slug(),
                tour.fields().destination()
            )
            .to_lowercase();
            fuzzy_rank(&needle, &haystack).map(|score| (score, idx))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().map(|(_, idx)| idx).collect()
}

const FUZZY_RATIO_CUTOFF: f64 = 55.0;

fn fuzzy_rank(needle: &str, haystack: &str) -> Option<i64> {
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let subsequence = is_subsequence(needle, haystack);
    if !subsequence && ratio < FUZZY_RATIO_CUTOFF {
        return None;
    }

    let mut score = (ratio * 10.0) as i64;
    if haystack.contains(needle) {
        score += 2000;
    } else if subsequence {
        score += 1000;
    }
    Some(score)
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .all(|nc| chars.any(|hc| hc == nc))
}
