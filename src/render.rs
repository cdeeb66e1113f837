//! Server-side HTML for the two pages.
use std::fmt::Write;

use crate::details::{DetailsPage, DetailsState, NO_SELECTION_MESSAGE};
use crate::models::{image_url, MovieSummary};
use crate::search::SearchState;
use crate::trending::TrendingState;
use crate::utils::{escape_html, format_rating, release_year};

const NO_POSTER: &str = "/no-movie.png";
const NO_PROFILE: &str = "/no-profile.png";

pub fn home_page(query: &str, trending: &TrendingState, search: &SearchState) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<header><h5>StreamVibe</h5><h1>Find <span class="text-gradient">Movies</span> You'll Enjoy Without the Hassle</h1>
<form class="search" method="get" action="/"><input type="text" name="query" value="{}" placeholder="Search through thousands of movies"></form></header>
"#,
        escape_html(query)
    );
    body.push_str(&trending_section(trending));
    body.push_str(&movies_section(search));
    layout("StreamVibe", &body)
}

fn trending_section(trending: &TrendingState) -> String {
    let mut out = String::from("<section class=\"trending\"><h2>Trending Searches</h2>\n");
    match trending {
        TrendingState::Loading => out.push_str("<div class=\"spinner\"></div>\n"),
        _ => {
            if let Some(message) = trending.message() {
                let _ = writeln!(out, "<p class=\"error\">{}</p>", escape_html(message));
            } else {
                out.push_str("<ul>\n");
                for (index, record) in trending.records().iter().enumerate() {
                    let title = record.title.as_deref().unwrap_or(&record.search_term);
                    let poster = record.poster_url.as_deref().unwrap_or(NO_POSTER);
                    let _ = writeln!(
                        out,
                        r#"<li><p>{}</p><img src="{}" alt="Poster of movie {}"></li>"#,
                        index + 1,
                        escape_html(poster),
                        escape_html(title)
                    );
                }
                out.push_str("</ul>\n");
            }
        }
    }
    out.push_str("</section>\n");
    out
}

fn movies_section(search: &SearchState) -> String {
    let mut out = String::from("<section class=\"all-movies\"><h2>All Movies</h2>\n");
    if search.is_loading {
        out.push_str("<div class=\"spinner\"></div>\n");
    } else if let Some(message) = &search.error_message {
        let _ = writeln!(out, "<p class=\"error\">{}</p>", escape_html(message));
    } else {
        out.push_str("<ul>\n");
        for movie in &search.movies {
            out.push_str(&movie_card(movie));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");
    out
}

pub fn movie_card(movie: &MovieSummary) -> String {
    let poster = image_url(movie.poster_path.as_deref(), "w500");
    let rating = format_rating(movie.vote_average.filter(|v| *v != 0.0), "N/A");
    let year = release_year(movie.release_date.as_deref())
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        r#"<li class="movie-card"><a href="/movie-details?id={id}"><img src="{poster}" alt="Poster of movie {title}"><h3>{title}</h3><div class="content"><span class="rating">{rating}</span> • <span class="lang">{lang}</span> • <span class="year">{year}</span></div></a></li>
"#,
        id = movie.id,
        poster = escape_html(poster.as_deref().unwrap_or(NO_POSTER)),
        title = escape_html(&movie.title),
        rating = rating,
        lang = escape_html(&movie.original_language.to_uppercase()),
        year = year,
    )
}

pub fn details_page(state: &DetailsState) -> String {
    match state {
        DetailsState::NoSelection => layout(
            "StreamVibe",
            &format!("<div class=\"notice\">{}</div>\n", NO_SELECTION_MESSAGE),
        ),
        DetailsState::Failed { message } => layout(
            "StreamVibe",
            &format!("<div class=\"notice error\">{}</div>\n", escape_html(message)),
        ),
        DetailsState::Loaded { page } => layout(&page.title, &loaded_details(page)),
    }
}

fn loaded_details(page: &DetailsPage) -> String {
    let mut out = String::new();

    // Hero
    let backdrop = page
        .backdrop_url
        .as_deref()
        .map(|url| format!("background-image:url('{}')", escape_html(url)))
        .unwrap_or_else(|| "background-image:linear-gradient(90deg,#111827,#0f172a)".to_string());
    let _ = writeln!(out, r#"<div class="hero" style="{}">"#, backdrop);
    match &page.poster_url {
        Some(url) => {
            let _ = writeln!(
                out,
                r#"<img class="poster" src="{}" alt="{}">"#,
                escape_html(url),
                escape_html(&page.title)
            );
        }
        None => out.push_str("<div class=\"poster empty\">No Poster</div>\n"),
    }
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(&page.title));
    if let Some(tagline) = &page.tagline {
        let _ = writeln!(out, "<p class=\"tagline\">{}</p>", escape_html(tagline));
    }
    let year = page
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "—".to_string());
    let _ = write!(out, "<div class=\"meta\"><span>{}</span> • <span>{}</span>", year, page.runtime);
    if !page.genres.is_empty() {
        let _ = write!(out, " • <span>{}</span>", escape_html(&page.genres.join(", ")));
    }
    out.push_str("</div>\n");
    let _ = writeln!(
        out,
        r#"<div class="rating">⭐ {} <span>/10</span> <span class="votes">{} votes</span></div>"#,
        page.rating, page.vote_count
    );
    out.push_str("<div class=\"genres\">");
    for genre in &page.genres {
        let _ = write!(out, "<span class=\"chip\">{}</span>", escape_html(genre));
    }
    out.push_str("</div>\n");
    if let Some(overview) = &page.overview {
        let _ = writeln!(out, "<p class=\"overview\">{}</p>", escape_html(overview));
    }
    out.push_str("</div>\n");

    // Facts grid
    let facts = &page.facts;
    out.push_str("<section class=\"facts\"><dl>\n");
    for (label, value) in [
        ("Status", &facts.status),
        ("Release Date", &facts.release_date),
        ("Runtime", &facts.runtime),
        ("Language", &facts.languages),
        ("Country", &facts.countries),
        ("Popularity", &facts.popularity),
        ("Budget", &facts.budget),
        ("Revenue", &facts.revenue),
        ("Production", &facts.production),
    ] {
        let _ = writeln!(out, "<dt>{}</dt><dd>{}</dd>", label, escape_html(value));
    }
    out.push_str("</dl></section>\n");

    if !page.cast.is_empty() {
        out.push_str("<section class=\"cast\"><h2>Top Cast</h2><div class=\"strip\">\n");
        for member in &page.cast {
            let _ = writeln!(
                out,
                r#"<div class="person"><img src="{}" alt="{}"><p>{}</p><p class="character">{}</p></div>"#,
                escape_html(member.profile_url.as_deref().unwrap_or(NO_PROFILE)),
                escape_html(&member.name),
                escape_html(&member.name),
                escape_html(member.character.as_deref().unwrap_or("")),
            );
        }
        out.push_str("</div></section>\n");
    }

    if !page.similar.is_empty() {
        out.push_str("<section class=\"similar\"><h2>Similar Movies</h2><div class=\"strip\">\n");
        for movie in &page.similar {
            let _ = writeln!(
                out,
                r#"<a class="similar-card" href="/movie-details?id={}"><img src="{}" alt="{}"><p>{}</p></a>"#,
                movie.id,
                escape_html(movie.poster_url.as_deref().unwrap_or(NO_POSTER)),
                escape_html(&movie.title),
                escape_html(&movie.title),
            );
        }
        out.push_str("</div></section>\n");
    }

    // Bottom bar; the trailer link is inert without a trailer.
    out.push_str("<footer class=\"bottom-bar\">");
    if page.trailer.is_available() {
        let _ = write!(
            out,
            r#"<a class="play" href="/movie-details?id={}&amp;trailer=1">▶ Play Trailer</a>"#,
            page.id
        );
    } else {
        out.push_str(r#"<span class="play disabled">▶ Play Trailer</span>"#);
    }
    let _ = writeln!(out, "<span class=\"caption\">{}</span></footer>", escape_html(&page.caption()));

    if let Some(url) = page.trailer.overlay_url() {
        let _ = writeln!(
            out,
            r#"<div class="trailer-overlay"><iframe src="{}" title="Trailer" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe><a class="close" href="/movie-details?id={}">✕</a></div>"#,
            escape_html(url),
            page.id
        );
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body><main>\n{}</main></body></html>\n",
        escape_html(title),
        body
    )
}
