//! Declarative configuration
//!
//! The component reads two attributes from its host, once, at construction:
//!
//! | Attribute | Values | Default |
//! |-----------|--------|---------|
//! | `swap` | `outerHTML`, `innerHTML` | `outerHTML` |
//! | `delay` | non-negative integer milliseconds | `0` |
//!
//! An unknown `swap` value is fatal. A malformed `delay` falls back to zero
//! with a warning, matching how browsers treat non-numeric timeouts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::warn_log;

/// Custom element tag name of the component.
pub const TAG_NAME: &str = "ajax-form";

/// Attribute holding the settle delay in milliseconds.
pub const DELAY_ATTRIBUTE: &str = "delay";

/// Attribute holding the swap mode.
pub const SWAP_ATTRIBUTE: &str = "swap";

/// How response markup replaces the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapMode {
	/// Replace the host element itself, tag included.
	#[default]
	#[serde(rename = "outerHTML")]
	OuterReplace,
	/// Replace only the host's contents.
	#[serde(rename = "innerHTML")]
	InnerReplace,
}

impl SwapMode {
	/// Returns the attribute spelling of the mode.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::OuterReplace => "outerHTML",
			Self::InnerReplace => "innerHTML",
		}
	}
}

impl fmt::Display for SwapMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SwapMode {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"outerHTML" => Ok(Self::OuterReplace),
			"innerHTML" => Ok(Self::InnerReplace),
			other => Err(ConfigError::InvalidSwap(other.to_string())),
		}
	}
}

/// Resolved component options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AjaxFormConfig {
	/// Wait between the submission outcome and re-enabling the form.
	#[serde(with = "millis")]
	pub delay: Duration,
	/// Swap mode applied to successful responses.
	pub swap: SwapMode,
}

impl AjaxFormConfig {
	/// Creates a configuration with explicit values.
	pub fn new(delay: Duration, swap: SwapMode) -> Self {
		Self { delay, swap }
	}

	/// Resolves the configuration from an attribute lookup.
	///
	/// # Examples
	///
	/// ```
	/// use ajax_form_pages::{AjaxFormConfig, SwapMode};
	/// use std::time::Duration;
	///
	/// let config = AjaxFormConfig::from_attributes(|name| match name {
	///     "swap" => Some("innerHTML".to_string()),
	///     "delay" => Some("250".to_string()),
	///     _ => None,
	/// })
	/// .unwrap();
	///
	/// assert_eq!(config.swap, SwapMode::InnerReplace);
	/// assert_eq!(config.delay, Duration::from_millis(250));
	///
	/// assert!(AjaxFormConfig::from_attributes(|name| {
	///     (name == "swap").then(|| "beforeend".to_string())
	/// })
	/// .is_err());
	/// ```
	pub fn from_attributes<F>(attribute: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let swap = match attribute(SWAP_ATTRIBUTE) {
			Some(value) => value.parse()?,
			None => SwapMode::default(),
		};
		let delay = attribute(DELAY_ATTRIBUTE)
			.map(|value| parse_delay(&value))
			.unwrap_or_default();

		Ok(Self { delay, swap })
	}

	/// Renders the wrapper start tag for server-side templates.
	///
	/// ```
	/// use ajax_form_pages::AjaxFormConfig;
	///
	/// assert_eq!(
	///     AjaxFormConfig::default().open_tag(),
	///     "<ajax-form swap='outerHTML' delay='0'>"
	/// );
	/// ```
	pub fn open_tag(&self) -> String {
		format!(
			"<{TAG_NAME} {SWAP_ATTRIBUTE}='{}' {DELAY_ATTRIBUTE}='{}'>",
			self.swap,
			self.delay.as_millis()
		)
	}

	/// Renders the closing tag matching [`open_tag`](Self::open_tag).
	pub fn close_tag(&self) -> String {
		format!("</{TAG_NAME}>")
	}

	/// Wraps form markup in an `ajax-form` element.
	pub fn wrap(&self, form_markup: &str) -> String {
		format!("{}{}{}", self.open_tag(), form_markup, self.close_tag())
	}
}

fn parse_delay(value: &str) -> Duration {
	match value.trim().parse::<u64>() {
		Ok(millis) => Duration::from_millis(millis),
		Err(_) => {
			warn_log!("ignoring invalid {} value {:?}, using 0", DELAY_ATTRIBUTE, value);
			Duration::ZERO
		}
	}
}

mod millis {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub(super) fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
		serializer.serialize_u64(millis)
	}

	pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}
