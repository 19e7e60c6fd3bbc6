//! Tests for session settings parsing.

use std::collections::HashMap;

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use uuid::Uuid;

struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    fn with_len(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("docvault-session-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self { path }
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn env_with(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

#[fixture]
fn key_file() -> KeyFile {
    KeyFile::with_len(SESSION_KEY_MIN_LEN)
}

fn release_env(key: &KeyFile, overrides: &[(&str, &str)]) -> MockEnv {
    let location = key.location();
    let mut vars = vec![
        (KEY_FILE_ENV, location.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ];
    for (name, value) in overrides {
        vars.retain(|(existing, _)| existing != name);
        vars.push((*name, *value));
    }
    env_with(&vars)
}

#[rstest]
fn release_accepts_a_complete_configuration(key_file: KeyFile) {
    let env = release_env(&key_file, &[(SAMESITE_ENV, "lax"), (TTL_HOURS_ENV, "8")]);
    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, StdDuration::from_secs(8 * 3600));
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_ENV)]
#[case::same_site(SAMESITE_ENV)]
#[case::ephemeral(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(key_file: KeyFile, #[case] missing: &'static str) {
    let location = key_file.location();
    let vars: Vec<(&str, &str)> = [
        (KEY_FILE_ENV, location.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]
    .into_iter()
    .filter(|(name, _)| *name != missing)
    .collect();
    let result = session_settings_from_env(&env_with(&vars), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::MissingEnv { name }) if name == missing
    ));
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_ENV, "maybe")]
#[case::same_site(SAMESITE_ENV, "sometimes")]
#[case::ttl(TTL_HOURS_ENV, "0")]
#[case::ttl_text(TTL_HOURS_ENV, "a day")]
fn release_rejects_malformed_values(
    key_file: KeyFile,
    #[case] name: &'static str,
    #[case] value: &'static str,
) {
    let env = release_env(&key_file, &[(name, value)]);
    let result = session_settings_from_env(&env, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv { name: found, .. }) if found == name
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure(key_file: KeyFile) {
    let env = release_env(&key_file, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
    let result = session_settings_from_env(&env, BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::InsecureSameSiteNone)));
}

#[rstest]
fn release_rejects_ephemeral_keys(key_file: KeyFile) {
    let env = release_env(&key_file, &[(ALLOW_EPHEMERAL_ENV, "yes")]);
    let result = session_settings_from_env(&env, BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::EphemeralNotAllowed)));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = KeyFile::with_len(SESSION_KEY_MIN_LEN - 1);
    let env = release_env(&short, &[]);
    let result = session_settings_from_env(&env, BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_requires_a_readable_key() {
    let missing = std::env::temp_dir().join(format!("docvault-absent-{}", Uuid::new_v4()));
    let location = missing.to_string_lossy().into_owned();
    let env = env_with(&[
        (KEY_FILE_ENV, location.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]);
    let result = session_settings_from_env(&env, BuildMode::Release);
    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn debug_falls_back_to_development_defaults() {
    let missing = std::env::temp_dir().join(format!("docvault-absent-{}", Uuid::new_v4()));
    let location = missing.to_string_lossy().into_owned();
    let env = env_with(&[(KEY_FILE_ENV, location.as_str())]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, StdDuration::from_secs(24 * 3600));
}

#[rstest]
fn debug_tolerates_malformed_toggles(key_file: KeyFile) {
    let env = release_env(
        &key_file,
        &[
            (COOKIE_SECURE_ENV, "perhaps"),
            (SAMESITE_ENV, "loose"),
            (TTL_HOURS_ENV, "-3"),
        ],
    );
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("tolerated");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, StdDuration::from_secs(24 * 3600));
}

#[rstest]
#[case("1", Some(true))]
#[case(" YES ", Some(true))]
#[case("n", Some(false))]
#[case("False", Some(false))]
#[case("", None)]
#[case("2", None)]
fn boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
