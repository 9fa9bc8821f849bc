use super::*;

use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

// =============================================================
// VendorTag::parse
// =============================================================

#[test]
fn blank_vendor_id_is_not_configured() {
    assert_eq!(VendorTag::parse(AnalyticsVendor::Clarity, None), Ok(None));
    assert_eq!(VendorTag::parse(AnalyticsVendor::Clarity, Some("   ")), Ok(None));
}

#[test]
fn vendor_id_is_trimmed() {
    let tag = VendorTag::parse(AnalyticsVendor::Clarity, Some(" abc123xyz ")).unwrap().unwrap();
    assert_eq!(tag.id, "abc123xyz");
    assert_eq!(tag.vendor, AnalyticsVendor::Clarity);
}

#[test]
fn ga_placeholder_is_rejected() {
    assert_eq!(
        VendorTag::parse(AnalyticsVendor::GoogleAnalytics, Some(GA_PLACEHOLDER_ID)),
        Err(ConfigError::Placeholder { var: GA_MEASUREMENT_ID_VAR, value: GA_PLACEHOLDER_ID.into() })
    );
}

#[test]
fn vendor_id_with_script_characters_is_rejected() {
    let raw = "abc\");alert(1)//";
    assert_eq!(
        VendorTag::parse(AnalyticsVendor::Clarity, Some(raw)),
        Err(ConfigError::InvalidId { var: CLARITY_PROJECT_ID_VAR, value: raw.into() })
    );
}

#[test]
fn script_urls_embed_the_id() {
    let clarity = VendorTag { vendor: AnalyticsVendor::Clarity, id: "proj1".into() };
    assert_eq!(clarity.script_src(), "https://www.clarity.ms/tag/proj1");
    assert_eq!(AnalyticsVendor::Clarity.element_id(), "consent-gate-clarity");

    let ga = VendorTag { vendor: AnalyticsVendor::GoogleAnalytics, id: "G-ABC123".into() };
    assert_eq!(ga.script_src(), "https://www.googletagmanager.com/gtag/js?id=G-ABC123");
    assert!(ga.bootstrap_snippet().contains("gtag('config','G-ABC123'"));
    assert!(ga.bootstrap_snippet().contains("'ad_storage':'denied'"));
}

#[test]
fn ga_consent_mode_follows_grant_and_revoke() {
    let ga = VendorTag { vendor: AnalyticsVendor::GoogleAnalytics, id: "G-ABC123".into() };
    assert!(ga.bootstrap_snippet().contains("gtag('consent','update',{'analytics_storage':'granted'})"));
    let revoke = ga.revocation_snippet().unwrap();
    assert!(revoke.contains("'consent','update',{'analytics_storage':'denied'}"));

    let clarity = VendorTag { vendor: AnalyticsVendor::Clarity, id: "proj1".into() };
    assert_eq!(clarity.revocation_snippet(), None);
}

// =============================================================
// AnalyticsConfig::from_lookup
// =============================================================

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = AnalyticsConfig::from_lookup(lookup(&[]));
    assert_eq!(cfg, AnalyticsConfig::default());
    assert_eq!(cfg.banner.quiet_period, Duration::from_millis(DEFAULT_BANNER_DELAY_MS));
    assert_eq!(cfg.banner.decline_policy, DeclinePolicy::SessionOnly);
    assert!(cfg.tag(AnalyticsVendor::Clarity).is_none());
}

#[test]
fn lookup_overrides_every_setting() {
    let cfg = AnalyticsConfig::from_lookup(lookup(&[
        (CLARITY_PROJECT_ID_VAR, "proj1"),
        (GA_MEASUREMENT_ID_VAR, "G-ABC123"),
        (BANNER_DELAY_VAR, "250"),
        (PERSIST_DECLINE_VAR, "true"),
    ]));
    assert_eq!(cfg.tag(AnalyticsVendor::Clarity).map(|t| t.id.as_str()), Some("proj1"));
    assert_eq!(cfg.tag(AnalyticsVendor::GoogleAnalytics).map(|t| t.id.as_str()), Some("G-ABC123"));
    assert_eq!(cfg.banner.quiet_period, Duration::from_millis(250));
    assert_eq!(cfg.banner.decline_policy, DeclinePolicy::Persist);
}

#[test]
fn invalid_values_fall_back_without_failing() {
    let cfg = AnalyticsConfig::from_lookup(lookup(&[
        (CLARITY_PROJECT_ID_VAR, "bad id"),
        (GA_MEASUREMENT_ID_VAR, GA_PLACEHOLDER_ID),
        (BANNER_DELAY_VAR, "soon"),
        (PERSIST_DECLINE_VAR, "maybe"),
    ]));
    assert_eq!(cfg, AnalyticsConfig::default());
}

#[test]
fn vendor_env_vars_are_distinct() {
    assert_ne!(AnalyticsVendor::Clarity.env_var(), AnalyticsVendor::GoogleAnalytics.env_var());
    assert_eq!(AnalyticsVendor::ALL.len(), 2);
}
