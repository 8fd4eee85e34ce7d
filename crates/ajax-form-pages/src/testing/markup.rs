//! Just enough HTML reading for the in-memory DOM.
//!
//! Recognizes top-level `<ajax-form>` elements and, inside markup, the
//! first `<form>` with its `<input name value>` controls. Everything else
//! stays opaque text.

use crate::config::TAG_NAME;

use super::document::MemoryForm;

pub(super) enum Fragment<'a> {
	Text(&'a str),
	Host {
		attributes: Vec<(String, String)>,
		inner: &'a str,
	},
}

/// Splits `markup` into text runs and `<ajax-form>` elements.
pub(super) fn split_hosts(markup: &str) -> Vec<Fragment<'_>> {
	let open = format!("<{TAG_NAME}");
	let close = format!("</{TAG_NAME}>");
	let mut fragments = Vec::new();
	let mut rest = markup;

	while let Some(start) = find_tag(rest, &open) {
		let after = &rest[start + open.len()..];
		let Some(tag_end) = after.find('>') else {
			break;
		};
		if start > 0 {
			fragments.push(Fragment::Text(&rest[..start]));
		}
		let attributes = parse_attributes(&after[..tag_end]);
		let body = &after[tag_end + 1..];
		let (inner, next) = match body.find(&close) {
			Some(end) => (&body[..end], &body[end + close.len()..]),
			None => (body, ""),
		};
		fragments.push(Fragment::Host { attributes, inner });
		rest = next;
	}
	if !rest.is_empty() {
		fragments.push(Fragment::Text(rest));
	}
	fragments
}

/// Builds a form from the first `<form>` in `markup`.
pub(super) fn parse_form(markup: &str) -> Option<MemoryForm> {
	let start = find_tag(markup, "<form")?;
	let after = &markup["<form".len() + start..];
	let tag_end = after.find('>')?;
	let attributes = parse_attributes(&after[..tag_end]);
	let body = &after[tag_end + 1..];
	let body = body.find("</form>").map_or(body, |end| &body[..end]);

	// Browsers default a missing method to GET.
	let mut form = MemoryForm::new(
		attribute(&attributes, "action").unwrap_or_default(),
		attribute(&attributes, "method").unwrap_or_else(|| "get".to_string()),
	);
	let mut rest = body;
	while let Some(start) = find_tag(rest, "<input") {
		let after = &rest[start + "<input".len()..];
		let Some(end) = after.find('>') else {
			break;
		};
		let attributes = parse_attributes(&after[..end]);
		if let Some(name) = attribute(&attributes, "name") {
			let value = attribute(&attributes, "value").unwrap_or_default();
			form = form.with_field(&name, &value);
		}
		rest = &after[end + 1..];
	}
	Some(form)
}

pub(super) fn attribute(attributes: &[(String, String)], name: &str) -> Option<String> {
	attributes
		.iter()
		.find(|(n, _)| n == name)
		.map(|(_, v)| v.clone())
}

fn find_tag(haystack: &str, open: &str) -> Option<usize> {
	haystack.match_indices(open).map(|(at, _)| at).find(|&at| {
		haystack[at + open.len()..]
			.chars()
			.next()
			.is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
	})
}

fn parse_attributes(tag: &str) -> Vec<(String, String)> {
	let mut attributes = Vec::new();
	let mut rest = tag.trim_start();

	while !rest.is_empty() {
		let name_end = rest
			.find(|c: char| c.is_whitespace() || c == '=' || c == '/')
			.unwrap_or(rest.len());
		let name = &rest[..name_end];
		rest = rest[name_end..].trim_start();

		let mut value = String::new();
		if let Some(assigned) = rest.strip_prefix('=') {
			let assigned = assigned.trim_start();
			match assigned.chars().next() {
				Some(quote @ ('"' | '\'')) => {
					let quoted = &assigned[1..];
					let end = quoted.find(quote).unwrap_or(quoted.len());
					value = quoted[..end].to_string();
					rest = quoted.get(end + 1..).unwrap_or("");
				}
				_ => {
					let end = assigned.find(char::is_whitespace).unwrap_or(assigned.len());
					value = assigned[..end].to_string();
					rest = &assigned[end..];
				}
			}
		}

		if name.is_empty() {
			// Stray `/` of a self-closing tag.
			rest = rest.get(1..).unwrap_or("");
		} else {
			attributes.push((name.to_ascii_lowercase(), value));
		}
		rest = rest.trim_start();
	}
	attributes
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::FormElement;
	use rstest::rstest;

	fn pairs(attributes: &[(&str, &str)]) -> Vec<(String, String)> {
		attributes
			.iter()
			.map(|(n, v)| (n.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	#[case("", &[])]
	#[case(" swap=\"innerHTML\"", &[("swap", "innerHTML")])]
	#[case(" swap='outerHTML' delay='0'", &[("swap", "outerHTML"), ("delay", "0")])]
	#[case(" form-submitting delay=250", &[("form-submitting", ""), ("delay", "250")])]
	#[case(" name=\"a\" value=\"1\" /", &[("name", "a"), ("value", "1")])]
	fn test_parse_attributes(#[case] tag: &str, #[case] expected: &[(&str, &str)]) {
		assert_eq!(parse_attributes(tag), pairs(expected));
	}

	#[rstest]
	fn test_split_hosts_keeps_surrounding_text() {
		let fragments =
			split_hosts("<p>before</p><ajax-form swap='innerHTML'><p>x</p></ajax-form><p>after</p>");

		assert_eq!(fragments.len(), 3);
		assert!(matches!(fragments[0], Fragment::Text("<p>before</p>")));
		match &fragments[1] {
			Fragment::Host { attributes, inner } => {
				assert_eq!(attributes, &pairs(&[("swap", "innerHTML")]));
				assert_eq!(*inner, "<p>x</p>");
			}
			Fragment::Text(_) => panic!("expected a host"),
		}
		assert!(matches!(fragments[2], Fragment::Text("<p>after</p>")));
	}

	#[rstest]
	fn test_split_hosts_ignores_similar_tags() {
		let fragments = split_hosts("<ajax-formula></ajax-formula>");

		assert_eq!(fragments.len(), 1);
		assert!(matches!(fragments[0], Fragment::Text(_)));
	}

	#[rstest]
	fn test_parse_form_reads_named_inputs() {
		let form = parse_form(
			"<p class='error'>Required</p><form action='/submit' method='POST'>\
			 <input name='a' value='1'><input type='submit'><input name='b'></form>",
		)
		.unwrap();

		assert_eq!(form.action(), "/submit");
		assert_eq!(form.method(), "POST");
		assert_eq!(
			form.entries().unwrap(),
			pairs(&[("a", "1"), ("b", "")])
		);
	}

	#[rstest]
	fn test_parse_form_without_form() {
		assert!(parse_form("<p>thanks</p>").is_none());
	}
}
