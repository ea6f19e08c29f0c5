//! Inhaltsmoderation
//!
//! Reine Texttransformation: jedes durch ein einzelnes Leerzeichen getrennte
//! Wort wird ohne Beachtung der Gross-/Kleinschreibung mit der Sperrliste
//! verglichen und bei exaktem Treffer durch `****` ersetzt. Satzzeichen
//! gehoeren zum Wort, "kerfuffle!" bleibt also stehen.

/// Gesperrte Woerter (kleingeschrieben)
pub const VERBOTENE_WOERTER: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const ERSATZ: &str = "****";

/// Ersetzt verbotene Woerter, Abstaende und Reihenfolge bleiben erhalten
pub fn zensieren(text: &str) -> String {
    text.split(' ')
        .map(|wort| {
            let klein = wort.to_lowercase();
            if VERBOTENE_WOERTER.contains(&klein.as_str()) {
                ERSATZ
            } else {
                wort
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
