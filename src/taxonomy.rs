// Simplified taxonomic hierarchy (kingdom through species) and the static
// table of human-readable descriptions used to annotate it.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// The ranks kept in a `Hierarchy`, from broadest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl Rank {
    pub const ALL: [Rank; 7] = [
        Rank::Kingdom,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
    ];

    /// Case-insensitive match on the rank name the service reports.
    /// Intermediate ranks (subphylum, superfamily, ...) yield `None`.
    pub fn from_name(name: &str) -> Option<Rank> {
        let name = name.trim();
        Rank::ALL
            .into_iter()
            .find(|rank| rank.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Kingdom => "kingdom",
            Rank::Phylum => "phylum",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }

    /// Capitalised name for display.
    pub fn label(self) -> &'static str {
        match self {
            Rank::Kingdom => "Kingdom",
            Rank::Phylum => "Phylum",
            Rank::Class => "Class",
            Rank::Order => "Order",
            Rank::Family => "Family",
            Rank::Genus => "Genus",
            Rank::Species => "Species",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named taxon at one rank. `description` is empty when the name is not
/// in the description table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Taxon {
    pub name: String,
    pub description: String,
}

impl Taxon {
    /// Builds a taxon and fills in its description from the table.
    pub fn described(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = describe(&name).to_string();
        Self { name, description }
    }
}

/// One rank per slot; absent ranks are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    ranks: [Option<Taxon>; 7],
}

impl Hierarchy {
    pub fn get(&self, rank: Rank) -> Option<&Taxon> {
        self.ranks[rank.index()].as_ref()
    }

    pub fn set(&mut self, rank: Rank, taxon: Taxon) {
        self.ranks[rank.index()] = Some(taxon);
    }

    /// Present ranks, broadest first.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, &Taxon)> {
        Rank::ALL
            .into_iter()
            .filter_map(|rank| self.get(rank).map(|taxon| (rank, taxon)))
    }

    /// Builds a hierarchy from `(rank name, taxon name)` pairs as reported by
    /// the service. Pairs at ranks outside the fixed set are dropped; when a
    /// rank repeats, the later pair wins.
    pub fn from_entries<I, R, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (R, N)>,
        R: AsRef<str>,
        N: Into<String>,
    {
        let mut hierarchy = Hierarchy::default();
        for (rank_name, taxon_name) in entries {
            if let Some(rank) = Rank::from_name(rank_name.as_ref()) {
                hierarchy.set(rank, Taxon::described(taxon_name));
            }
        }
        hierarchy
    }
}

impl Serialize for Hierarchy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (rank, taxon) in self.iter() {
            map.serialize_entry(rank.as_str(), taxon)?;
        }
        map.end()
    }
}

/// Display-only annotations for well-known taxa. Not exhaustive; names not
/// listed simply get no description.
const RANK_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Animalia", "Animals"),
    ("Plantae", "Plants"),
    ("Chordata", "Animals with spinal cords"),
    ("Arthropoda", "Jointed-leg invertebrates"),
    ("Mollusca", "Molluscs"),
    ("Mammalia", "Mammals"),
    ("Aves", "Birds"),
    ("Reptilia", "Reptiles"),
    ("Amphibia", "Amphibians"),
    ("Actinopterygii", "Ray-finned fishes"),
    ("Insecta", "Insects"),
    ("Carnivora", "Meat-eating mammals"),
    ("Perissodactyla", "Odd-toed ungulates"),
    ("Artiodactyla", "Even-toed ungulates"),
    ("Primates", "Primates"),
    ("Rodentia", "Rodents"),
    ("Accipitriformes", "Hawks, eagles, and kites"),
    ("Sphenisciformes", "Penguins"),
    ("Squamata", "Lizards and snakes"),
    ("Equidae", "Horse family"),
    ("Felidae", "Cat family"),
    ("Canidae", "Dog family"),
    ("Ursidae", "Bear family"),
    ("Delphinidae", "Oceanic dolphins"),
    ("Accipitridae", "Hawks and eagles"),
    ("Spheniscidae", "Penguin family"),
    ("Equus", "Horses, zebras, and donkeys"),
    ("Canis", "Wolves, dogs, and jackals"),
    ("Panthera", "Big cats"),
    ("Haliaeetus", "Sea eagles"),
    ("Equus zebra", "Mountain zebra"),
];

/// Description for a taxon name, or `""` if none is known.
pub fn describe(taxon_name: &str) -> &'static str {
    RANK_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == taxon_name)
        .map(|(_, description)| *description)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_fixed_ranks_and_enriches() {
        let hierarchy = Hierarchy::from_entries([
            ("Kingdom", "Animalia"),
            ("Subkingdom", "Bilateria"),
            ("Phylum", "Chordata"),
            ("Subphylum", "Vertebrata"),
            ("Class", "Mammalia"),
            ("Order", "Perissodactyla"),
            ("Family", "Equidae"),
            ("Genus", "Equus"),
            ("Species", "Equus zebra"),
            ("Subspecies", "Equus zebra hartmannae"),
        ]);

        let ranks: Vec<Rank> = hierarchy.iter().map(|(rank, _)| rank).collect();
        assert_eq!(ranks, Rank::ALL.to_vec());
        assert_eq!(
            hierarchy.get(Rank::Species),
            Some(&Taxon {
                name: "Equus zebra".into(),
                description: "Mountain zebra".into(),
            })
        );
    }

    #[test]
    fn unknown_taxon_gets_empty_description() {
        let hierarchy = Hierarchy::from_entries([("genus", "Ailurus")]);
        assert_eq!(hierarchy.get(Rank::Genus).map(|t| t.description.as_str()), Some(""));
        assert_eq!(hierarchy.get(Rank::Family), None);
    }

    #[test]
    fn rank_names_match_case_insensitively() {
        assert_eq!(Rank::from_name("ORDER"), Some(Rank::Order));
        assert_eq!(Rank::from_name(" family "), Some(Rank::Family));
        assert_eq!(Rank::from_name("Infraorder"), None);
    }

    #[test]
    fn serializes_present_ranks_only() {
        let hierarchy = Hierarchy::from_entries([("Kingdom", "Animalia"), ("Class", "Aves")]);
        let json = serde_json::to_value(&hierarchy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kingdom": { "name": "Animalia", "description": "Animals" },
                "class": { "name": "Aves", "description": "Birds" },
            })
        );
    }
}
