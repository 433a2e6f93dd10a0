//! HTML rendering of suggestion emails.

use std::fmt::Write;
use tera::escape_html;

use crate::models::{ReservationRequest, Restaurant};

pub const SUGGESTION_SUBJECT: &str = "Restaurant Suggestion from Dining Concierge Service";

const COLUMNS: [&str; 4] = ["Name", "Address", "Rating", "Reviews"];

const CELL_STYLE: &str = "padding: 10px; border-bottom: 1px solid #dddddd;";

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn cells(restaurant: &Restaurant) -> [String; 4] {
    [
        restaurant.name.clone(),
        restaurant.address.clone(),
        restaurant.rating.to_string(),
        restaurant.reviews.map(|n| n.to_string()).unwrap_or_default(),
    ]
}

/// Render the suggestion email for `request`; rows keep the order of `restaurants`.
pub fn render_suggestions(request: &ReservationRequest, restaurants: &[Restaurant]) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px;">
<div style="background-color: #ffffff; border-radius: 10px; padding: 20px; max-width: 600px; margin: auto;">
<h2 style="color: #333333; text-align: center;">Hello! Here are my {} Restaurant suggestions for {} people, at {} on {}, in {}</h2>
"#,
        escape_html(&title_case(&request.cuisine)),
        request.people,
        escape_html(&request.time),
        escape_html(&request.date),
        escape_html(&title_case(&request.city)),
    );

    if restaurants.is_empty() {
        let _ = write!(
            html,
            r#"<p style="font-size: 16px; color: #333333; text-align: center;">Sorry, I couldn't find any {} restaurants to suggest right now. Please try again later or pick another cuisine.</p>
"#,
            escape_html(&title_case(&request.cuisine)),
        );
    } else {
        html.push_str(
            r#"<table style="width: 100%; border-collapse: collapse; margin-top: 20px;">
<thead><tr style="background-color: #f8c471; color: #ffffff; text-align: left;">"#,
        );
        for column in COLUMNS {
            let _ = write!(html, "<th style='{}'>{}</th>", CELL_STYLE, column);
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        for restaurant in restaurants {
            html.push_str("<tr>");
            for cell in cells(restaurant) {
                let _ = write!(
                    html,
                    "<td style='{}'>{}</td>",
                    CELL_STYLE,
                    escape_html(&title_case(&cell))
                );
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
        html.push_str(
            r#"<p style="font-size: 16px; color: #333333; text-align: center; margin-top: 30px;">Hope you like our suggestions!</p>
"#,
        );
    }

    html.push_str("<h4>Best,<br>Your Dining Concierge</h4>\n</div>\n</body>\n</html>\n");
    html
}
