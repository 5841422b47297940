const TARIFF_KEYWORDS: [&str; 5] = ["tarif", "prix", "kwh", "augmentation", "facture"];
const GAS_KEYWORDS: [&str; 5] = ["gaz", "m3", "pcs", "pci", "coefficient"];

pub const TARIFF_FALLBACK_ANSWER: &str = "Sans accès à l'IA, voici une indication générale : \
les tarifs électricité et gaz évoluent en fonction du marché, \
des taxes (ex. CSPE/CTA/TURPE) et de la puissance/consommation. \
Pour une estimation, précisez votre offre, puissance (kVA), \
consommation annuelle (kWh) et zone. \
Consultez aussi les références officielles \
(CRE, Enedis, GRDF, service-public).";

pub const GAS_FALLBACK_ANSWER: &str = "Pour le gaz, la facturation se fait en kWh via un coefficient \
de conversion (m³ → kWh) dépendant du pouvoir calorifique \
(PCS/PCI) et de la zone. \
Vérifiez votre facture pour le coefficient exact \
et la zone GRDF.";

pub const GENERIC_FALLBACK_ANSWER: &str = "Je n'ai pas accès au service d'IA pour le moment. \
Donnez plus de détails (contexte, chiffres, offre, période) \
et je fournirai un guide méthodologique pas à pas.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackDomain {
    #[default]
    Energy,
    Email,
}

impl FallbackDomain {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Email => "email",
        }
    }
}

/// Canned answer used when the completion path is unavailable. Plain substring
/// matching on the lower-cased text; tariff keywords are checked before gas.
pub fn fallback_answer(user_text: &str, domain: FallbackDomain) -> &'static str {
    if domain == FallbackDomain::Energy {
        let text = user_text.to_lowercase();

        if contains_any(&text, &TARIFF_KEYWORDS) {
            return TARIFF_FALLBACK_ANSWER;
        }

        if contains_any(&text, &GAS_KEYWORDS) {
            return GAS_FALLBACK_ANSWER;
        }
    }

    GENERIC_FALLBACK_ANSWER
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
