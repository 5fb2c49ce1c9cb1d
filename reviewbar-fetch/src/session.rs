//! Ambient session probe over browser cookie databases.
//!
//! The review tool authenticates with a browser session cookie rather than
//! a stored credential. This module answers "does the user have a live
//! session?" by reading the cookie straight from the browser's cookie
//! database, without talking to the network.
//!
//! ## Supported Browsers
//!
//! - **Firefox**: Full support (SQLite, no encryption)
//! - **Chrome/Edge**: Detected, but encrypted cookie values are skipped
//!   (decryption would require platform keychain access)
//!
//! ## Security Note
//!
//! Cookie data is sensitive. Only the single cookie a provider asks for is
//! ever read, scoped to that provider's host.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::error::CookieError;

/// Offset between the Windows/Chromium epoch (1601-01-01) and Unix epoch,
/// in seconds.
const CHROMIUM_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

// ============================================================================
// Browser Enum
// ============================================================================

/// Supported browsers for session-cookie probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    /// Mozilla Firefox browser.
    Firefox,
    /// Google Chrome browser.
    Chrome,
    /// Microsoft Edge browser.
    Edge,
}

impl Browser {
    /// Returns the display name for this browser.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Firefox => "Firefox",
            Self::Chrome => "Chrome",
            Self::Edge => "Edge",
        }
    }

    /// Returns all browser variants.
    pub fn all() -> &'static [Browser] {
        &[Self::Firefox, Self::Chrome, Self::Edge]
    }

    /// Default probe order. Firefox first: no encryption, most reliable.
    pub fn default_priority() -> &'static [Browser] {
        &[Self::Firefox, Self::Chrome, Self::Edge]
    }

    /// Whether this browser encrypts cookie values on disk.
    pub fn uses_encrypted_cookies(&self) -> bool {
        matches!(self, Self::Chrome | Self::Edge)
    }

    /// Returns the cookie database path for this browser on macOS.
    #[cfg(target_os = "macos")]
    pub fn cookie_db_path(&self) -> Option<PathBuf> {
        let home = dirs::home_dir()?;

        let path = match self {
            Self::Firefox => {
                let profiles_dir = home.join("Library/Application Support/Firefox/Profiles");
                find_firefox_default_profile(&profiles_dir)?.join("cookies.sqlite")
            }
            Self::Chrome => {
                home.join("Library/Application Support/Google/Chrome/Default/Cookies")
            }
            Self::Edge => {
                home.join("Library/Application Support/Microsoft Edge/Default/Cookies")
            }
        };

        Some(path)
    }

    /// Returns the cookie database path for this browser on Linux.
    #[cfg(target_os = "linux")]
    pub fn cookie_db_path(&self) -> Option<PathBuf> {
        let home = dirs::home_dir()?;

        let path = match self {
            Self::Firefox => {
                let profiles_dir = home.join(".mozilla/firefox");
                find_firefox_default_profile(&profiles_dir)?.join("cookies.sqlite")
            }
            Self::Chrome => home.join(".config/google-chrome/Default/Cookies"),
            Self::Edge => home.join(".config/microsoft-edge/Default/Cookies"),
        };

        Some(path)
    }

    /// Cookie databases are not probed on other platforms.
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    pub fn cookie_db_path(&self) -> Option<PathBuf> {
        None
    }

    /// Check if this browser is installed.
    pub fn is_installed(&self) -> bool {
        self.cookie_db_path().is_some_and(|p| p.exists())
    }
}

/// Find the default Firefox profile directory.
fn find_firefox_default_profile(profiles_dir: &Path) -> Option<PathBuf> {
    if !profiles_dir.exists() {
        return None;
    }

    let entries = fs::read_dir(profiles_dir).ok()?;

    // Look for a profile ending in ".default-release" or ".default"
    let mut default_profile: Option<PathBuf> = None;
    let mut any_profile: Option<PathBuf> = None;

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_dir() {
            if name.ends_with(".default-release") {
                return Some(entry.path());
            } else if name.ends_with(".default") {
                default_profile = Some(entry.path());
            } else {
                any_profile = Some(entry.path());
            }
        }
    }

    default_profile.or(any_profile)
}

// ============================================================================
// Cookie
// ============================================================================

/// A browser cookie.
#[derive(Debug, Clone)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Host the cookie belongs to.
    pub host: String,
    /// Expiration time. `None` means a session cookie.
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    /// Returns true if the cookie is expired.
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|exp| exp < Utc::now())
    }

    /// Cookie header fragment (`name=value`).
    pub fn to_header(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

// ============================================================================
// Session Store
// ============================================================================

/// Probes browser cookie databases for a provider's session cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    browsers: Vec<Browser>,
}

impl SessionStore {
    /// Creates a store over the installed browsers, in probe priority
    /// order.
    pub fn discover() -> Self {
        let browsers: Vec<Browser> = Browser::default_priority()
            .iter()
            .filter(|b| b.is_installed())
            .copied()
            .collect();
        debug!(count = browsers.len(), "Discovered browsers");
        Self { browsers }
    }

    /// Creates a store over an explicit browser list.
    pub fn with_browsers(browsers: Vec<Browser>) -> Self {
        Self { browsers }
    }

    /// Returns the browsers this store probes.
    pub fn browsers(&self) -> &[Browser] {
        &self.browsers
    }

    /// Finds a live (non-expired) cookie for `host` with the given name.
    ///
    /// Browsers are probed in order; read failures are logged and the next
    /// browser is tried. Returns `None` when no browser has the cookie,
    /// which callers treat as "not signed in".
    pub fn find_cookie(&self, host: &str, name: &str) -> Option<Cookie> {
        for browser in &self.browsers {
            match read_cookie(*browser, host, name) {
                Ok(Some(cookie)) if !cookie.is_expired() => {
                    debug!(browser = %browser.display_name(), host = %host, "Session cookie found");
                    return Some(cookie);
                }
                Ok(Some(_)) => {
                    trace!(browser = %browser.display_name(), "Cookie present but expired");
                }
                Ok(None) => {
                    trace!(browser = %browser.display_name(), "No cookie in this browser");
                }
                Err(e) => {
                    warn!(browser = %browser.display_name(), error = %e, "Cookie probe failed");
                }
            }
        }
        None
    }
}

// ============================================================================
// Database Readers
// ============================================================================

/// Reads one cookie from a browser's database.
fn read_cookie(browser: Browser, host: &str, name: &str) -> Result<Option<Cookie>, CookieError> {
    let db_path = browser.cookie_db_path().ok_or_else(|| {
        CookieError::DatabaseNotFound {
            browser: browser.display_name().to_string(),
            path: "<no known path>".to_string(),
        }
    })?;

    if !db_path.exists() {
        return Err(CookieError::DatabaseNotFound {
            browser: browser.display_name().to_string(),
            path: db_path.display().to_string(),
        });
    }

    match browser {
        Browser::Firefox => read_firefox_cookie(&db_path, host, name),
        Browser::Chrome | Browser::Edge => read_chromium_cookie(&db_path, host, name),
    }
}

/// Copies a database aside so a browser holding the lock doesn't block us.
fn copy_to_temp(db_path: &Path) -> Result<PathBuf, CookieError> {
    let temp_path = std::env::temp_dir().join(format!(
        "reviewbar-cookies-{}-{}.sqlite",
        std::process::id(),
        db_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    ));
    fs::copy(db_path, &temp_path)?;
    Ok(temp_path)
}

/// Read a cookie from a Firefox `cookies.sqlite` database.
fn read_firefox_cookie(
    db_path: &Path,
    host: &str,
    name: &str,
) -> Result<Option<Cookie>, CookieError> {
    debug!(path = %db_path.display(), "Reading Firefox cookie");

    // Firefox locks the database, so copy to temp
    let temp_path = copy_to_temp(db_path)?;

    let result = (|| {
        let conn = Connection::open_with_flags(&temp_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| CookieError::ReadFailed(format!("SQLite open error: {}", e)))?;

        // Firefox schema:
        // CREATE TABLE moz_cookies (id INTEGER PRIMARY KEY, name TEXT,
        //   value TEXT, host TEXT, path TEXT, expiry INTEGER, ...)
        let mut stmt = conn
            .prepare(
                "SELECT name, value, host, expiry
                 FROM moz_cookies
                 WHERE name = ?1 AND (host = ?2 OR host = ?3)",
            )
            .map_err(|e| CookieError::ReadFailed(format!("Prepare error: {}", e)))?;

        let dotted_host = format!(".{}", host);
        let cookie = stmt
            .query_map([name, host, dotted_host.as_str()], |row| {
                let expiry: i64 = row.get(3)?;
                // expiry 0 marks a session cookie
                let expires = if expiry > 0 {
                    Utc.timestamp_opt(expiry, 0).single()
                } else {
                    None
                };

                Ok(Cookie {
                    name: row.get(0)?,
                    value: row.get(1)?,
                    host: row.get(2)?,
                    expires,
                })
            })
            .map_err(|e| CookieError::ReadFailed(format!("Query error: {}", e)))?
            .filter_map(|r| r.ok())
            .next();

        Ok(cookie)
    })();

    // Clean up temp file
    let _ = fs::remove_file(&temp_path);

    result
}

/// Read a cookie from a Chromium-family `Cookies` database.
///
/// Encrypted values (the common case on modern Chrome) are skipped rather
/// than decrypted; only plaintext values are returned.
fn read_chromium_cookie(
    db_path: &Path,
    host: &str,
    name: &str,
) -> Result<Option<Cookie>, CookieError> {
    debug!(path = %db_path.display(), "Reading Chromium cookie");

    let temp_path = copy_to_temp(db_path)?;

    let result = (|| {
        let conn = Connection::open_with_flags(&temp_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| CookieError::ReadFailed(format!("SQLite open error: {}", e)))?;

        // Chromium schema:
        // CREATE TABLE cookies (creation_utc INTEGER, host_key TEXT,
        //   name TEXT, value TEXT, encrypted_value BLOB,
        //   expires_utc INTEGER, ...)
        let mut stmt = conn
            .prepare(
                "SELECT name, value, host_key, expires_utc
                 FROM cookies
                 WHERE name = ?1 AND (host_key = ?2 OR host_key = ?3)",
            )
            .map_err(|e| CookieError::ReadFailed(format!("Prepare error: {}", e)))?;

        let dotted_host = format!(".{}", host);
        let cookie = stmt
            .query_map([name, host, dotted_host.as_str()], |row| {
                let expires_utc: i64 = row.get(3)?;
                // expires_utc is microseconds since 1601-01-01; 0 marks a
                // session cookie
                let expires = if expires_utc > 0 {
                    let unix = expires_utc / 1_000_000 - CHROMIUM_EPOCH_OFFSET_SECS;
                    Utc.timestamp_opt(unix, 0).single()
                } else {
                    None
                };

                Ok(Cookie {
                    name: row.get(0)?,
                    value: row.get(1)?,
                    host: row.get(2)?,
                    expires,
                })
            })
            .map_err(|e| CookieError::ReadFailed(format!("Query error: {}", e)))?
            .filter_map(|r| r.ok())
            // An empty value means the real value sits encrypted in
            // encrypted_value, which we don't decrypt.
            .find(|c: &Cookie| !c.value.is_empty());

        Ok(cookie)
    })();

    let _ = fs::remove_file(&temp_path);

    result
}

// ============================================================================
// Tests
// ============================================================================
