//! Catalog of well-known AIDs to probe
//!
//! Categories are plain read-only tables. [`Catalog::full`] and
//! [`Catalog::quick`] assemble them into the two scan profiles; the HCE
//! prefix sweep is generated since it is just `F0 00` to `F0 0F`.

use std::borrow::Cow;

use hex_literal::hex;

use crate::aid::Aid;

/// One named AID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AidCatalogEntry {
    /// Human readable label
    pub name: Cow<'static, str>,
    /// The identifier itself
    pub aid: Aid,
}

impl AidCatalogEntry {
    /// Entry backed by static data
    pub const fn new(name: &'static str, aid: &'static [u8]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            aid: Aid::from_static(aid),
        }
    }
}

/// A named group of entries, scanned and reported together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category label shown in reports
    pub name: &'static str,
    /// Entries in probe order
    pub entries: Vec<AidCatalogEntry>,
}

impl Category {
    fn from_table(name: &'static str, table: &'static [(&'static str, &'static [u8])]) -> Self {
        Self {
            name,
            entries: table
                .iter()
                .map(|&(label, aid)| AidCatalogEntry::new(label, aid))
                .collect(),
        }
    }
}

/// Payment system environments and NFC Forum applications
pub static SYSTEM_AIDS: &[(&str, &[u8])] = &[
    // "2PAY.SYS.DDF01"
    ("PPSE (Payment)", &hex!("32 50 41 59 2E 53 59 53 2E 44 44 46 30 31")),
    // "1PAY.SYS.DDF01"
    ("PSE (Payment)", &hex!("31 50 41 59 2E 53 59 53 2E 44 44 46 30 31")),
    ("NDEF Type 4", &hex!("D2 76 00 00 85 01 01")),
    ("NDEF Tag App", &hex!("D2 76 00 00 85 01 00")),
];

/// Card scheme and wallet payment applications
pub static PAYMENT_AIDS: &[(&str, &[u8])] = &[
    ("Visa Credit/Debit", &hex!("A0 00 00 00 03 10 10")),
    ("Visa Electron", &hex!("A0 00 00 00 03 20 10")),
    ("V Pay", &hex!("A0 00 00 00 03 20 20")),
    ("Mastercard Credit", &hex!("A0 00 00 00 04 10 10")),
    ("Mastercard Maestro", &hex!("A0 00 00 00 04 30 60")),
    ("AMEX", &hex!("A0 00 00 00 25 01 01 01")),
    ("JCB", &hex!("A0 00 00 00 65 10 10 01")),
    ("UnionPay Debit", &hex!("A0 00 00 03 33 01 01 01")),
    ("UnionPay Credit", &hex!("A0 00 00 03 33 01 01 02")),
    ("Discover", &hex!("A0 00 00 01 52 30 10")),
    ("Samsung Pay Visa", &hex!("A0 00 00 00 03 10 10 02")),
    ("Samsung Pay MC", &hex!("A0 00 00 00 04 10 10 02")),
    ("Google Pay", &hex!("A0 00 00 00 03 10 10")),
    ("Apple Pay", &hex!("A0 00 00 00 04 10 10")),
];

/// Korean transit, payment and identity applications
pub static KOREAN_AIDS: &[(&str, &[u8])] = &[
    ("T-Money", &hex!("D4 10 00 00 03 00 01")),
    ("T-Money (Alt)", &hex!("D4 10 00 00 03 00 02")),
    ("Cashbee", &hex!("D4 10 00 00 04 00 01")),
    ("Railplus", &hex!("D4 10 00 00 06 00 01")),
    ("Korea Smart Card", &hex!("D4 10 00 00 01")),
    ("Korean ID", &hex!("D4 10 00 00 01 00 01")),
    ("Korean ePassport", &hex!("A0 00 00 02 47 10 01")),
];

/// Campus cards and the access-control chips they are usually built on
pub static UNIVERSITY_AIDS: &[(&str, &[u8])] = &[
    // "KONKUK"
    ("KONKUK (HEX)", &hex!("F0 4B 4F 4E 4B 55 4B")),
    // "KUWAVE"
    ("KONKUK Univ", &hex!("F0 4B 55 57 41 56 45")),
    ("DESFire Default", &hex!("A0 00 00 00 04 01")),
    ("DESFire", &hex!("D2 76 00 00 85 01 00")),
    ("MIFARE Plus", &hex!("A0 00 00 03 96 56 43 4C")),
    ("HID iCLASS", &hex!("A0 00 00 01 16 00 00")),
];

/// Proprietary AIDs commonly registered by Android HCE services
pub static HCE_COMMON_AIDS: &[(&str, &[u8])] = &[
    ("Android HCE Sample", &hex!("F0 01 02 03 04 05 06")),
    ("Android Beam", &hex!("D2 76 00 00 85 01 01")),
    ("HCE Loyalty", &hex!("F0 41 43 4D 45 01 01")),
    // "ACCESS"
    ("Access Control", &hex!("F0 41 43 43 45 53 53")),
    // "ROOM01"
    ("Smart Room", &hex!("F0 52 4F 4F 4D 30 31")),
    // "CLASS01"
    ("Smart Class", &hex!("F0 43 4C 41 53 53 30 31")),
];

/// The short list used when reading plain cards
pub static BASIC_CARD_AIDS: &[(&str, &[u8])] = &[
    ("NDEF", &hex!("D2 76 00 00 85 01 01")),
    ("T-Money", &hex!("D4 10 00 00 03 00 01")),
    ("Mifare DESFire", &hex!("A0 00 00 00 04 01")),
    ("Korean ID", &hex!("D4 10 00 00 01")),
    ("University", &hex!("F0 4B 4F 4E 4B 55 4B")),
];

/// Partial AIDs `F0 00` to `F0 0F`
///
/// `F0` is the proprietary RID category most custom HCE services use, and
/// cards that support partial selection answer to the two-byte prefix.
pub fn hce_prefix_sweep() -> Vec<AidCatalogEntry> {
    static PREFIXES: [[u8; 2]; 16] = {
        let mut out = [[0xF0, 0x00]; 16];
        let mut i = 0;
        while i < out.len() {
            out[i][1] = i as u8;
            i += 1;
        }
        out
    };

    PREFIXES
        .iter()
        .map(|prefix| AidCatalogEntry {
            name: Cow::Owned(format!("HCE F0-{:02X}", prefix[1])),
            aid: Aid::from_static(prefix),
        })
        .collect()
}

/// An ordered list of categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Every category, the prefix sweep last
    pub fn full() -> Self {
        Self {
            categories: vec![
                Category::from_table("System/Environment", SYSTEM_AIDS),
                Category::from_table("Payment Apps", PAYMENT_AIDS),
                Category::from_table("Korean Transport/Payment", KOREAN_AIDS),
                Category::from_table("University/Education", UNIVERSITY_AIDS),
                Category::from_table("HCE Common", HCE_COMMON_AIDS),
                Category {
                    name: "HCE Prefix Scan (F0 XX)",
                    entries: hce_prefix_sweep(),
                },
            ],
        }
    }

    /// The categories most likely to hit on a phone
    pub fn quick() -> Self {
        Self {
            categories: vec![
                Category::from_table("System/Environment", SYSTEM_AIDS),
                Category::from_table("Korean Transport/Payment", KOREAN_AIDS),
                Category::from_table("HCE Common", HCE_COMMON_AIDS),
            ],
        }
    }

    /// The short list for plain cards
    pub fn basic() -> Self {
        Self {
            categories: vec![Category::from_table("Known Card AIDs", BASIC_CARD_AIDS)],
        }
    }

    /// Categories in probe order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// Check whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_tables_are_well_formed() {
        for table in [
            SYSTEM_AIDS,
            PAYMENT_AIDS,
            KOREAN_AIDS,
            UNIVERSITY_AIDS,
            HCE_COMMON_AIDS,
            BASIC_CARD_AIDS,
        ] {
            for &(name, aid) in table {
                let entry = AidCatalogEntry::new(name, aid);
                assert!(entry.aid.is_well_formed(), "{name} ({})", entry.aid);
            }
        }
    }

    #[test]
    fn test_prefix_sweep() {
        let sweep = hce_prefix_sweep();
        assert_eq!(sweep.len(), 16);
        assert_eq!(sweep[0].name, "HCE F0-00");
        assert_eq!(sweep[0].aid.as_bytes(), &[0xF0, 0x00]);
        assert_eq!(sweep[15].name, "HCE F0-0F");
        assert_eq!(sweep[15].aid.as_bytes(), &[0xF0, 0x0F]);
    }

    #[test]
    fn test_profiles() {
        let full = Catalog::full();
        let names: Vec<_> = full.categories().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "System/Environment",
                "Payment Apps",
                "Korean Transport/Payment",
                "University/Education",
                "HCE Common",
                "HCE Prefix Scan (F0 XX)",
            ]
        );
        assert_eq!(full.len(), 4 + 14 + 7 + 6 + 6 + 16);

        let quick = Catalog::quick();
        assert_eq!(quick.categories().len(), 3);
        assert_eq!(quick.len(), 4 + 7 + 6);

        assert_eq!(Catalog::basic().len(), 5);
        assert!(!Catalog::basic().is_empty());
    }
}
