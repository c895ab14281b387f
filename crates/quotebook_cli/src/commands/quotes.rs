//! Quote browsing and editing commands.

use super::CliWidget;
use crate::widget::Reply;
use quotebook_core::CategoryFilter;

/// Prints a random quote.
pub fn random(widget: &CliWidget) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", Reply::Quote(widget.show_random()));
    Ok(())
}

/// Adds a quote.
pub fn add(
    widget: &CliWidget,
    text: &str,
    category: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let quote = widget.add_quote(text, category)?;
    println!("{}", Reply::Added(quote));
    Ok(())
}

/// Lists quotes in `category`, or under the selected filter when `None`.
pub fn list(
    widget: &CliWidget,
    category: Option<&str>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let quotes = match category {
        Some(category) => widget.list_in(&CategoryFilter::parse(category)),
        None => widget.list(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&quotes)?),
        "text" => println!("{}", Reply::Quotes(quotes)),
        other => return Err(format!("Unknown format: {other}").into()),
    }
    Ok(())
}

/// Lists distinct categories.
pub fn categories(widget: &CliWidget, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let categories = widget.categories();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&categories)?),
        "text" => println!("{}", Reply::Categories(categories)),
        other => return Err(format!("Unknown format: {other}").into()),
    }
    Ok(())
}

/// Selects the category filter and prints the quotes it shows.
pub fn filter(widget: &mut CliWidget, category: &str) -> Result<(), Box<dyn std::error::Error>> {
    let quotes = widget.filter_by(category)?;
    println!("Selected category: {}", widget.selected_filter());
    println!("{}", Reply::Quotes(quotes));
    Ok(())
}
