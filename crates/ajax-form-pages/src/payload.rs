//! Form payload serialization

use std::fmt;

use serde::Serialize;

use crate::dom::{FormElement, Submitter};
use crate::error::SubmitError;

/// Ordered name/value pairs submitted by the component.
///
/// Form fields come first in document order, the submitter pair last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
	pairs: Vec<(String, String)>,
}

impl FormPayload {
	/// Creates an empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshots the form's current values and appends the submitter.
	///
	/// The submitter pair is appended even when its name is empty.
	pub fn collect<F: FormElement>(
		form: &F,
		submitter: Option<&Submitter>,
	) -> Result<Self, SubmitError> {
		let mut payload: Self = form.entries()?.into_iter().collect();
		if let Some(submitter) = submitter {
			payload.append(&submitter.name, &submitter.value);
		}
		Ok(payload)
	}

	/// Appends a pair.
	pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.pairs.push((name.into(), value.into()));
	}

	/// Returns the pairs in submission order.
	pub fn pairs(&self) -> &[(String, String)] {
		&self.pairs
	}

	/// Returns the number of pairs.
	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	/// Returns `true` when the payload has no pairs.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Encodes the payload as `application/x-www-form-urlencoded`.
	///
	/// # Examples
	///
	/// ```
	/// use ajax_form_pages::FormPayload;
	///
	/// let mut payload = FormPayload::new();
	/// payload.append("q", "rust & wasm");
	/// payload.append("go", "yes");
	///
	/// assert_eq!(payload.encode().unwrap(), "q=rust+%26+wasm&go=yes");
	/// ```
	pub fn encode(&self) -> Result<String, SubmitError> {
		serde_urlencoded::to_string(&self.pairs).map_err(|e| SubmitError::Encoding(e.to_string()))
	}

	/// Decodes an `application/x-www-form-urlencoded` string.
	pub fn decode(encoded: &str) -> Result<Self, SubmitError> {
		serde_urlencoded::from_str::<Vec<(String, String)>>(encoded)
			.map(|pairs| Self { pairs })
			.map_err(|e| SubmitError::Encoding(e.to_string()))
	}
}

impl<N, V> FromIterator<(N, V)> for FormPayload
where
	N: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		Self {
			pairs: iter
				.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		}
	}
}

impl fmt::Display for FormPayload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let encoded = self.encode().map_err(|_| fmt::Error)?;
		f.write_str(&encoded)
	}
}
