use kartei_core::language::Language;

/// Map a tagset tag to a readable part-of-speech name.
///
/// German tags are STTS (as emitted by TreeTagger's German parameter
/// file), English tags are Penn Treebank. Unknown tags pass through
/// unchanged so nothing is silently lost.
pub fn readable_pos(tag: &str, language: Language) -> &str {
    match language {
        Language::German => stts(tag),
        Language::English => penn(tag),
    }
}

fn stts(tag: &str) -> &str {
    match tag {
        "NN" | "NE" => "Noun",
        "VVINF" | "VVPP" | "VVFIN" | "VVIMP" | "VVP" | "VVIZU" => "Verb",
        "VAFIN" | "VAINF" | "VAPP" | "VMFIN" | "VMINF" => "Verb",
        "ADJD" | "ADJA" => "Adjective",
        "ADV" => "Adverb",
        "PPOSAT" | "PDAT" | "PIS" | "PIAT" | "PPER" => "Pronoun",
        "PTKVZ" | "APPR" | "APPRART" => "Particle/Preposition",
        "KOUI" | "KOUS" | "KON" => "Conjunction",
        "ART" => "Article",
        "APPO" => "Apposition",
        "CARD" => "Numeral",
        "FM" | "ITJ" => "Other",
        other => other,
    }
}

fn penn(tag: &str) -> &str {
    match tag {
        "NN" | "NNS" | "NP" | "NPS" | "NNP" | "NNPS" => "Noun",
        "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" | "MD" => "Verb",
        "VV" | "VVD" | "VVG" | "VVN" | "VVP" | "VVZ" => "Verb",
        "VH" | "VHD" | "VHG" | "VHN" | "VHP" | "VHZ" => "Verb",
        "JJ" | "JJR" | "JJS" => "Adjective",
        "RB" | "RBR" | "RBS" => "Adverb",
        "PP" | "PRP" | "PP$" | "PRP$" | "WP" | "WP$" => "Pronoun",
        "IN" | "RP" | "TO" => "Particle/Preposition",
        "CC" => "Conjunction",
        "DT" | "WDT" => "Article",
        "CD" => "Numeral",
        "UH" | "FW" => "Other",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_tags() {
        assert_eq!(readable_pos("NN", Language::German), "Noun");
        assert_eq!(readable_pos("VVINF", Language::German), "Verb");
        assert_eq!(readable_pos("VBG", Language::English), "Verb");
        assert_eq!(readable_pos("JJ", Language::English), "Adjective");
    }

    #[test]
    fn unknown_tags_pass_through() {
        assert_eq!(readable_pos("XY", Language::German), "XY");
        assert_eq!(readable_pos("SYM", Language::English), "SYM");
    }
}
