//! Models for the settings collection.
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fixed key of the one settings record.
pub const SETTINGS_ID: &str = "settings";

/// The global settings record. There is exactly one of these per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Company shown on reports and letterheads.
    pub company_info: CompanyInfo,
    /// Which alerts are sent out.
    pub notifications: Notifications,
    /// Time of the last write, millisecond precision.
    pub updated_at: DateTime<Utc>,
}

/// Company details.
///
/// Fields are optional because an update replaces the whole branch: a partial object leaves the
/// omitted fields unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Registered company name.
    #[serde(default, deserialize_with = "coerce::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contractor license number.
    #[serde(default, deserialize_with = "coerce::string", skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Postal address.
    #[serde(default, deserialize_with = "coerce::string", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Alert switches. Unset fields follow the same rule as [`CompanyInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    /// Alert when inventory runs low.
    #[serde(default, deserialize_with = "coerce::boolean", skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,
    /// Alert when a project exceeds its budget.
    #[serde(default, deserialize_with = "coerce::boolean", skip_serializing_if = "Option::is_none")]
    pub budget_overrun: Option<bool>,
    /// Alert on compliance deadlines.
    #[serde(default, deserialize_with = "coerce::boolean", skip_serializing_if = "Option::is_none")]
    pub compliance: Option<bool>,
}

/// Partial update sent by clients.
///
/// A branch is only touched when the payload carries a truthy value for it: `null`, `false`,
/// `0` and `""` count as absent. A present branch replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    /// Replacement for [`Settings::company_info`].
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub company_info: Option<CompanyInfo>,
    /// Replacement for [`Settings::notifications`].
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Notifications>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: Some(String::from("BuildCore Construction Ltd.")),
            license: Some(String::from("BC-8829-X")),
            address: Some(String::from("123 Industrial Way, Suite 400, Seattle, WA")),
        }
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            low_stock: Some(true),
            budget_overrun: Some(true),
            compliance: Some(false),
        }
    }
}

impl Settings {
    /// Settings with every default value, created at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            company_info: CompanyInfo::default(),
            notifications: Notifications::default(),
            updated_at: now.trunc_subsecs(3),
        }
    }

    /// Replace the branches the update carries and bump `updated_at`.
    ///
    /// This is a whole-branch overwrite, not a deep merge. Sending `{"notifications": {"compliance": true}}`
    /// drops `lowStock` and `budgetOverrun`.
    pub fn apply(&mut self, update: UpdateSettings, now: DateTime<Utc>) {
        let UpdateSettings {
            company_info,
            notifications,
        } = update;

        if let Some(company_info) = company_info {
            self.company_info = company_info;
        }
        if let Some(notifications) = notifications {
            self.notifications = notifications;
        }

        self.touch(now);
    }

    /// Set `updated_at` to `now`, or one millisecond past the stored value if the clock hasn't
    /// moved beyond it.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let now = now.trunc_subsecs(3);
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

fn truthy<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(ref n) if n.as_f64() == Some(0.0) => Ok(None),
        Value::String(ref s) if s.is_empty() => Ok(None),
        Value::Object(map) => T::deserialize(Value::Object(map))
            .map(Some)
            .map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected an object, found `{}`",
            other
        ))),
    }
}

/// Lenient field casts, so `"true"` is a boolean and `42` is a name.
mod coerce {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Loose>::deserialize(de)?.map(|loose| match loose {
            Loose::Bool(b) => b.to_string(),
            Loose::Int(i) => i.to_string(),
            Loose::Float(f) => f.to_string(),
            Loose::Text(s) => s,
        }))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
        let loose = match Option::<Loose>::deserialize(de)? {
            Some(loose) => loose,
            None => return Ok(None),
        };
        match loose {
            Loose::Bool(b) => Ok(Some(b)),
            Loose::Int(1) => Ok(Some(true)),
            Loose::Int(0) => Ok(Some(false)),
            Loose::Text(s) => match s.as_str() {
                "true" | "1" | "yes" => Ok(Some(true)),
                "false" | "0" | "no" => Ok(Some(false)),
                _ => Err(D::Error::custom(format!(
                    "cannot cast `{}` to a boolean",
                    s
                ))),
            },
            Loose::Int(_) | Loose::Float(_) => {
                Err(D::Error::custom("cannot cast number to a boolean"))
            }
        }
    }
}
