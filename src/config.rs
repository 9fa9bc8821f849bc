//! Analytics and banner configuration, fixed at build time.
//!
//! The WASM bundle has no process environment, so values are captured with
//! `option_env!` when the crate is compiled:
//!
//! - `CLARITY_PROJECT_ID`: Microsoft Clarity project; absent disables Clarity
//! - `GA_MEASUREMENT_ID`: Google Analytics 4 stream; absent disables GA
//! - `CONSENT_BANNER_DELAY_MS`: quiet period before the banner shows (default 1000)
//! - `CONSENT_PERSIST_DECLINE`: `true` to remember Decline (default `false`)
//!
//! Invalid values are logged and fall back to the disabled/default state.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::error::ConfigError;
use crate::state::banner::DeclinePolicy;

pub const CLARITY_PROJECT_ID_VAR: &str = "CLARITY_PROJECT_ID";
pub const GA_MEASUREMENT_ID_VAR: &str = "GA_MEASUREMENT_ID";
pub const BANNER_DELAY_VAR: &str = "CONSENT_BANNER_DELAY_MS";
pub const PERSIST_DECLINE_VAR: &str = "CONSENT_PERSIST_DECLINE";

/// Id shipped in the GA template; never a real stream.
pub const GA_PLACEHOLDER_ID: &str = "G-XXXXXXXXXX";

pub const DEFAULT_BANNER_DELAY_MS: u64 = 1000;

/// Third-party analytics vendors gated on consent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnalyticsVendor {
    Clarity,
    GoogleAnalytics,
}

impl AnalyticsVendor {
    pub const ALL: [Self; 2] = [Self::Clarity, Self::GoogleAnalytics];

    pub fn env_var(self) -> &'static str {
        match self {
            Self::Clarity => CLARITY_PROJECT_ID_VAR,
            Self::GoogleAnalytics => GA_MEASUREMENT_ID_VAR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::GoogleAnalytics => "google-analytics",
        }
    }

    /// DOM id for the rendered tag.
    pub fn element_id(self) -> String {
        format!("consent-gate-{}", self.label())
    }
}

/// A configured vendor and its validated id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorTag {
    pub vendor: AnalyticsVendor,
    pub id: String,
}

impl VendorTag {
    /// Validate `raw` for `vendor`. Blank input means "not configured" and
    /// yields `Ok(None)`.
    pub fn parse(vendor: AnalyticsVendor, raw: Option<&str>) -> Result<Option<Self>, ConfigError> {
        let Some(id) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let var = vendor.env_var();
        if vendor == AnalyticsVendor::GoogleAnalytics && id == GA_PLACEHOLDER_ID {
            return Err(ConfigError::Placeholder { var, value: id.to_owned() });
        }
        // The id is spliced into a URL and an inline script.
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ConfigError::InvalidId { var, value: id.to_owned() });
        }
        Ok(Some(Self { vendor, id: id.to_owned() }))
    }

    /// Remote tag loaded with `async`.
    pub fn script_src(&self) -> String {
        match self.vendor {
            AnalyticsVendor::Clarity => format!("https://www.clarity.ms/tag/{}", self.id),
            AnalyticsVendor::GoogleAnalytics => {
                format!("https://www.googletagmanager.com/gtag/js?id={}", self.id)
            }
        }
    }

    /// Inline bootstrap that must run before the remote tag arrives.
    pub fn bootstrap_snippet(&self) -> String {
        match self.vendor {
            AnalyticsVendor::Clarity => {
                "window.clarity=window.clarity||function(){(window.clarity.q=window.clarity.q||[]).push(arguments)};"
                    .to_owned()
            }
            AnalyticsVendor::GoogleAnalytics => format!(
                "window.dataLayer=window.dataLayer||[];\
                 function gtag(){{dataLayer.push(arguments);}}\
                 gtag('consent','default',{{'analytics_storage':'granted','ad_storage':'denied',\
                 'ad_user_data':'denied','ad_personalization':'denied',\
                 'functionality_storage':'granted','security_storage':'granted'}});\
                 gtag('consent','update',{{'analytics_storage':'granted'}});\
                 gtag('js',new Date());\
                 gtag('config','{}',{{page_path:window.location.pathname,anonymize_ip:true,\
                 cookie_flags:'SameSite=None;Secure'}});",
                self.id
            ),
        }
    }

    /// Inline script run when consent is withdrawn after the tag loaded.
    /// Removing the script element does not stop a runtime that is already
    /// collecting, so vendors with a consent API are told directly.
    pub fn revocation_snippet(&self) -> Option<String> {
        match self.vendor {
            AnalyticsVendor::Clarity => None,
            AnalyticsVendor::GoogleAnalytics => Some(
                "if(typeof window.gtag==='function'){window.gtag('consent','update',{'analytics_storage':'denied'});}"
                    .to_owned(),
            ),
        }
    }
}

/// Consent banner behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BannerOptions {
    /// Delay before the prompt appears, so it does not compete with first paint.
    pub quiet_period: Duration,
    pub decline_policy: DeclinePolicy,
}

impl Default for BannerOptions {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(DEFAULT_BANNER_DELAY_MS),
            decline_policy: DeclinePolicy::SessionOnly,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub clarity: Option<VendorTag>,
    pub google_analytics: Option<VendorTag>,
    pub banner: BannerOptions,
}

impl AnalyticsConfig {
    /// Configuration captured when the crate was compiled.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|var| match var {
            CLARITY_PROJECT_ID_VAR => option_env!("CLARITY_PROJECT_ID").map(str::to_owned),
            GA_MEASUREMENT_ID_VAR => option_env!("GA_MEASUREMENT_ID").map(str::to_owned),
            BANNER_DELAY_VAR => option_env!("CONSENT_BANNER_DELAY_MS").map(str::to_owned),
            PERSIST_DECLINE_VAR => option_env!("CONSENT_PERSIST_DECLINE").map(str::to_owned),
            _ => None,
        })
    }

    /// Build from an arbitrary variable source. Rejected values are logged
    /// and replaced by their disabled/default form.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vendor_tag = |vendor: AnalyticsVendor| match VendorTag::parse(vendor, lookup(vendor.env_var()).as_deref()) {
            Ok(tag) => tag,
            Err(e) => {
                leptos::logging::warn!("{} disabled: {e}", vendor.label());
                None
            }
        };
        let clarity = vendor_tag(AnalyticsVendor::Clarity);
        let google_analytics = vendor_tag(AnalyticsVendor::GoogleAnalytics);

        let defaults = BannerOptions::default();
        let quiet_period = match parse_delay(lookup(BANNER_DELAY_VAR).as_deref()) {
            Ok(delay) => delay.unwrap_or(defaults.quiet_period),
            Err(e) => {
                leptos::logging::warn!("{e}; using {DEFAULT_BANNER_DELAY_MS}ms");
                defaults.quiet_period
            }
        };
        let decline_policy = match parse_decline_policy(lookup(PERSIST_DECLINE_VAR).as_deref()) {
            Ok(policy) => policy,
            Err(e) => {
                leptos::logging::warn!("{e}; declines stay session-only");
                DeclinePolicy::SessionOnly
            }
        };

        Self { clarity, google_analytics, banner: BannerOptions { quiet_period, decline_policy } }
    }

    pub fn tag(&self, vendor: AnalyticsVendor) -> Option<&VendorTag> {
        match vendor {
            AnalyticsVendor::Clarity => self.clarity.as_ref(),
            AnalyticsVendor::GoogleAnalytics => self.google_analytics.as_ref(),
        }
    }
}

fn parse_delay(raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidNumber { var: BANNER_DELAY_VAR, value: raw.to_owned() })
}

fn parse_decline_policy(raw: Option<&str>) -> Result<DeclinePolicy, ConfigError> {
    match raw.map(str::trim) {
        None | Some("" | "false" | "0") => Ok(DeclinePolicy::SessionOnly),
        Some("true" | "1") => Ok(DeclinePolicy::Persist),
        Some(other) => Err(ConfigError::InvalidBool { var: PERSIST_DECLINE_VAR, value: other.to_owned() }),
    }
}
