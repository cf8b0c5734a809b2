//! Human-readable output for the terminal.

use owo_colors::OwoColorize;
use quire_css::layout::{LayoutBox, SpacerOrigin};
use quire_css::DisplayCommand;
use quire_document::FinishedDocument;

/// Print one line per page and one per display command.
pub fn print_document(document: &FinishedDocument) {
    if let Some(title) = &document.metadata.title {
        println!("{} {}", "title:".bold(), title);
    }
    for page in &document.pages {
        println!(
            "{} {} (:{}) {:.1}x{:.1}pt, content at ({:.1}, {:.1}) {:.1}x{:.1}",
            "page".bold().green(),
            page.number,
            page.selector,
            page.size.width,
            page.size.height,
            page.content.x,
            page.content.y,
            page.content.width,
            page.content.height,
        );
        for command in page.display_list.commands() {
            print_command(command);
        }
    }
}

fn print_command(command: &DisplayCommand) {
    match command {
        DisplayCommand::FillRect {
            x,
            y,
            width,
            height,
            ..
        } => println!("  {} {x:.1},{y:.1} {width:.1}x{height:.1}", "fill".cyan()),
        DisplayCommand::StrokeBorder {
            x,
            y,
            width,
            height,
            ..
        } => println!("  {} {x:.1},{y:.1} {width:.1}x{height:.1}", "border".cyan()),
        DisplayCommand::DrawText { x, y, text, style, href } => {
            let link = href.as_deref().map(|h| format!(" -> {h}")).unwrap_or_default();
            println!(
                "  {} {x:.1},{y:.1} {:.1}pt \"{}\"{}",
                "text".yellow(),
                style.font_size,
                text.replace('\n', "\\n"),
                link.dimmed()
            );
        }
        DisplayCommand::DrawImage {
            x,
            y,
            width,
            height,
            src,
            ..
        } => println!(
            "  {} {x:.1},{y:.1} {width:.1}x{height:.1} {src}",
            "image".magenta()
        ),
    }
}

/// Print a box tree, one box per line, indented by depth.
pub fn print_boxes(boxes: &[LayoutBox]) {
    for layout_box in boxes {
        print_box(layout_box, 0);
    }
}

fn print_box(layout_box: &LayoutBox, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = |tag: &str| {
        if tag.is_empty() {
            "anonymous".to_string()
        } else {
            format!("<{tag}>")
        }
    };
    match layout_box {
        LayoutBox::Block(b) => {
            let marker = b.marker.as_ref().map(|m| format!(" {}", m.text)).unwrap_or_default();
            println!("{indent}{} {} w={:.1}{marker}", "block".bold().blue(), name(&b.tag), b.width);
            for child in &b.children {
                print_box(child, depth + 1);
            }
        }
        LayoutBox::Inline(b) => {
            let marker = b.marker.as_ref().map(|m| format!(" {}", m.text)).unwrap_or_default();
            let preview: String = b.run.text().chars().take(40).collect();
            println!(
                "{indent}{} {} w={:.1}{marker} \"{}\"",
                "paragraph".bold().green(),
                name(&b.tag),
                b.width,
                preview.replace('\n', "\\n")
            );
        }
        LayoutBox::Table(t) => {
            println!(
                "{indent}{} {} rows={} max={:.1}{}",
                "table".bold().magenta(),
                name(&t.tag),
                t.rows.len(),
                t.max_width,
                if t.stretch { " stretch" } else { "" }
            );
            for (r, row) in t.rows.iter().enumerate() {
                for cell in &row.cells {
                    println!(
                        "{indent}  {} row {r} ({}) span {}x{}",
                        if cell.header { "th" } else { "td" },
                        row.group,
                        cell.row_span(),
                        cell.col_span()
                    );
                    for content in &cell.contents {
                        print_box(content, depth + 2);
                    }
                }
            }
        }
        LayoutBox::Spacer(s) => {
            let origin = match s.origin {
                SpacerOrigin::CollapsedMargin => "margin",
                SpacerOrigin::TrailingMargin => "trailing margin",
            };
            println!("{indent}{} {:.1} ({origin})", "spacer".dimmed(), s.height);
        }
        LayoutBox::Empty => println!("{indent}{}", "empty".dimmed()),
    }
}
