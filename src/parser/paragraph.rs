use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{clean::clean, ExtractError, Heuristic};

static LANG_DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[lang]").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Elements that open a new section of the article body.
const STRUCTURAL: &[&str] = &["div", "section"];

/// Pull the lead biography out of a page and clean it.
///
/// `lang` is only consulted by [`Heuristic::Language`].
pub fn extract_lead(html: &str, lang: Option<&str>, heuristic: Heuristic) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    let raw = match heuristic {
        Heuristic::Language => {
            let lang = lang.ok_or(ExtractError::NoLanguage)?;
            let container = language_container(&document, lang).ok_or_else(|| {
                ExtractError::MissingContainer {
                    lang: lang.to_string(),
                }
            })?;
            lead_paragraphs(container)?
        }
        Heuristic::Bold => bold_paragraph(&document)?,
    };

    let text = clean(&raw);
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

fn language_container<'a>(document: &'a Html, lang: &str) -> Option<ElementRef<'a>> {
    document.select(&LANG_DIV).find(|div| {
        div.value()
            .attr("lang")
            .is_some_and(|value| value.eq_ignore_ascii_case(lang))
    })
}

/// Join the container's direct `<p>` children from the first one up to the
/// next structural sibling. Structural children ahead of the first paragraph
/// (short descriptions, hatnotes) are skipped.
fn lead_paragraphs(container: ElementRef<'_>) -> Result<String, ExtractError> {
    let mut parts: Vec<String> = Vec::new();
    let mut started = false;

    for child in container.children().filter_map(ElementRef::wrap) {
        let name = child.value().name();
        if name == "p" {
            started = true;
            parts.push(child.text().collect());
        } else if started && STRUCTURAL.contains(&name) {
            break;
        }
    }

    if !started {
        return Err(ExtractError::NoParagraph);
    }
    Ok(parts.join(" "))
}

/// First `<p>` whose very first child node is a `<b>` element.
fn bold_paragraph(document: &Html) -> Result<String, ExtractError> {
    document
        .select(&PARAGRAPH)
        .find(|p| {
            p.first_child()
                .and_then(|node| node.value().as_element())
                .is_some_and(|el| el.name() == "b")
        })
        .map(|p| p.text().collect())
        .ok_or(ExtractError::NoParagraph)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn minimal_lead_stops_at_structural_div() {
        let html = r#"<div lang="en"><p>John [1] Doe /dʒɒn/; served.</p><div>Early life</div></div>"#;
        let text = extract_lead(html, Some("en"), Heuristic::Language).unwrap();
        assert_eq!(text, "John Doe served.");
    }

    #[test]
    fn consecutive_paragraphs_are_joined() {
        let html = r#"<div lang="en"><p>First.</p><table><tr><td>x</td></tr></table><p>Second.</p><div>Career</div><p>Third.</p></div>"#;
        let text = extract_lead(html, Some("en"), Heuristic::Language).unwrap();
        assert_eq!(text, "First. Second.");
    }

    #[test]
    fn nested_paragraphs_are_not_direct_children() {
        let html = r#"<div lang="en"><div class="hatnote"><p>Not this.</p></div><p>This one.</p></div>"#;
        let text = extract_lead(html, Some("en"), Heuristic::Language).unwrap();
        assert_eq!(text, "This one.");
    }

    #[test]
    fn wrong_language_is_missing_container() {
        let html = r#"<div lang="fr"><p>Texte.</p></div>"#;
        let err = extract_lead(html, Some("en"), Heuristic::Language).unwrap_err();
        assert!(matches!(err, ExtractError::MissingContainer { lang } if lang == "en"));
    }

    #[test]
    fn language_match_ignores_case() {
        let html = r#"<div LANG="EN"><p>Upper.</p></div>"#;
        assert_eq!(extract_lead(html, Some("en"), Heuristic::Language).unwrap(), "Upper.");
    }

    #[test]
    fn container_without_paragraphs() {
        let html = r#"<div lang="en"><div>Only a heading</div></div>"#;
        let err = extract_lead(html, Some("en"), Heuristic::Language).unwrap_err();
        assert!(matches!(err, ExtractError::NoParagraph));
    }

    #[test]
    fn paragraph_that_cleans_to_nothing() {
        let html = r#"<div lang="en"><p>[1] /x/;</p></div>"#;
        let err = extract_lead(html, Some("en"), Heuristic::Language).unwrap_err();
        assert!(matches!(err, ExtractError::Empty));
    }

    #[test]
    fn no_language_code() {
        let err = extract_lead("<p>x</p>", None, Heuristic::Language).unwrap_err();
        assert!(matches!(err, ExtractError::NoLanguage));
    }

    #[test]
    fn wikipedia_like_page() {
        let html = fixture("wiki_lead");
        let text = extract_lead(&html, Some("en"), Heuristic::Language).unwrap();
        assert_eq!(
            text,
            "Jane Roe (born 4 May 1961) is a Freedonian politician who has served as \
             President of Freedonia since 2019. Before entering politics, Roe worked as a lawyer."
        );
        assert!(!text.contains("Early life"));
        assert!(!text.contains("Head of state"));
    }

    #[test]
    fn bold_heuristic_picks_first_bold_led_paragraph() {
        let html = fixture("wiki_lead");
        let text = extract_lead(&html, None, Heuristic::Bold).unwrap();
        assert_eq!(
            text,
            "Jane Roe (born 4 May 1961) is a Freedonian politician who has served as \
             President of Freedonia since 2019."
        );
    }

    #[test]
    fn bold_heuristic_without_match() {
        let err = extract_lead("<p>plain <b>late bold</b></p>", None, Heuristic::Bold).unwrap_err();
        assert!(matches!(err, ExtractError::NoParagraph));
    }
}
