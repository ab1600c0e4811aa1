//! Amazon storefronts a product link can point at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Amazon storefront used to build product and affiliate URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[default]
    Es,
    Us,
    Uk,
    De,
    Fr,
    It,
    Nl,
    Pl,
    Se,
    Ca,
    Mx,
    Br,
    Jp,
    In,
    Au,
}

impl Marketplace {
    const ALL: [Marketplace; 15] = [
        Marketplace::Es,
        Marketplace::Us,
        Marketplace::Uk,
        Marketplace::De,
        Marketplace::Fr,
        Marketplace::It,
        Marketplace::Nl,
        Marketplace::Pl,
        Marketplace::Se,
        Marketplace::Ca,
        Marketplace::Mx,
        Marketplace::Br,
        Marketplace::Jp,
        Marketplace::In,
        Marketplace::Au,
    ];

    /// Storefront domain without the `www.` prefix.
    pub fn domain(&self) -> &'static str {
        match self {
            Marketplace::Es => "amazon.es",
            Marketplace::Us => "amazon.com",
            Marketplace::Uk => "amazon.co.uk",
            Marketplace::De => "amazon.de",
            Marketplace::Fr => "amazon.fr",
            Marketplace::It => "amazon.it",
            Marketplace::Nl => "amazon.nl",
            Marketplace::Pl => "amazon.pl",
            Marketplace::Se => "amazon.se",
            Marketplace::Ca => "amazon.ca",
            Marketplace::Mx => "amazon.com.mx",
            Marketplace::Br => "amazon.com.br",
            Marketplace::Jp => "amazon.co.jp",
            Marketplace::In => "amazon.in",
            Marketplace::Au => "amazon.com.au",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Accept-Language header sent with page fetches.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Marketplace::Es | Marketplace::Mx => "es-ES,es;q=0.9,en;q=0.8",
            Marketplace::Us | Marketplace::Ca | Marketplace::Au => "en-US,en;q=0.9",
            Marketplace::Uk => "en-GB,en;q=0.9",
            Marketplace::De => "de-DE,de;q=0.9,en;q=0.8",
            Marketplace::Fr => "fr-FR,fr;q=0.9,en;q=0.8",
            Marketplace::It => "it-IT,it;q=0.9,en;q=0.8",
            Marketplace::Nl => "nl-NL,nl;q=0.9,en;q=0.8",
            Marketplace::Pl => "pl-PL,pl;q=0.9,en;q=0.8",
            Marketplace::Se => "sv-SE,sv;q=0.9,en;q=0.8",
            Marketplace::Br => "pt-BR,pt;q=0.9,en;q=0.8",
            Marketplace::Jp => "ja-JP,ja;q=0.9,en;q=0.8",
            Marketplace::In => "en-IN,en;q=0.9,hi;q=0.8",
        }
    }

    pub fn all() -> &'static [Marketplace] {
        &Self::ALL
    }

    fn code(&self) -> &'static str {
        match self {
            Marketplace::Es => "es",
            Marketplace::Us => "us",
            Marketplace::Uk => "uk",
            Marketplace::De => "de",
            Marketplace::Fr => "fr",
            Marketplace::It => "it",
            Marketplace::Nl => "nl",
            Marketplace::Pl => "pl",
            Marketplace::Se => "se",
            Marketplace::Ca => "ca",
            Marketplace::Mx => "mx",
            Marketplace::Br => "br",
            Marketplace::Jp => "jp",
            Marketplace::In => "in",
            Marketplace::Au => "au",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Marketplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let wanted = match wanted.as_str() {
            "gb" => "uk",
            "com" => "us",
            other => other,
        };

        Self::ALL
            .iter()
            .copied()
            .find(|m| m.code() == wanted || m.domain() == wanted)
            .ok_or_else(|| format!("Unknown marketplace: {}. Use a code such as es, us, de", s))
    }
}
