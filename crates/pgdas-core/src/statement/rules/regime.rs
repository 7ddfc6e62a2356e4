//! Tax regime (Anexo) classification.
//!
//! The activity description printed near the tax table is folded with
//! [`normalize`] and checked against an ordered rule table. The first rule
//! that matches decides; phrase sets overlap, so the order is part of the
//! contract.

use tracing::debug;

use super::anchor::{locate_anchor, window, REGIME_WINDOW_CHARS};
use super::normalize::normalize;
use crate::models::statement::TaxRegime;

/// Phrase condition over normalized text.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// At least one phrase is present.
    AnyOf(&'static [&'static str]),
    /// Every phrase is present, in any order.
    AllOf(&'static [&'static str]),
    /// Every phrase is present, each after the end of the previous one.
    InOrder(&'static [&'static str]),
}

impl Condition {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Condition::AnyOf(phrases) => phrases.iter().any(|p| text.contains(p)),
            Condition::AllOf(phrases) => phrases.iter().all(|p| text.contains(p)),
            Condition::InOrder(phrases) => {
                let mut rest = text;
                for phrase in phrases.iter() {
                    match rest.find(phrase) {
                        Some(pos) => rest = &rest[pos + phrase.len()..],
                        None => return false,
                    }
                }
                true
            }
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct RegimeRule {
    pub condition: Condition,
    pub regime: TaxRegime,
}

/// Classification rules in priority order.
pub const REGIME_RULES: [RegimeRule; 5] = [
    RegimeRule {
        condition: Condition::AnyOf(&["revenda de mercadorias"]),
        regime: TaxRegime::AnexoI,
    },
    RegimeRule {
        condition: Condition::AnyOf(&["mercadorias industrializadas", "industria"]),
        regime: TaxRegime::AnexoII,
    },
    RegimeRule {
        condition: Condition::AllOf(&["prestacao de servicos", "sem fator r"]),
        regime: TaxRegime::AnexoIII,
    },
    RegimeRule {
        condition: Condition::AnyOf(&["sujeitos ao anexo iv", "anexo iv"]),
        regime: TaxRegime::AnexoIV,
    },
    RegimeRule {
        condition: Condition::InOrder(&["prestacao de servicos", "tributados pelo anexo iii"]),
        regime: TaxRegime::AnexoIII,
    },
];

/// Classify an already-normalized text window.
pub fn classify_regime(normalized: &str) -> Option<TaxRegime> {
    REGIME_RULES
        .iter()
        .position(|rule| rule.condition.matches(normalized))
        .map(|index| {
            let regime = REGIME_RULES[index].regime;
            debug!("Regime rule {} matched -> {}", index + 1, regime);
            regime
        })
}

/// Classify the regime from the window following the tax-table title.
///
/// Documents without the title have no regime.
pub fn classify_document(text: &str) -> Option<TaxRegime> {
    let anchor = locate_anchor(text)?;
    classify_regime(&normalize(window(text, anchor, REGIME_WINDOW_CHARS)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule() {
        assert_eq!(classify_regime("revenda de mercadorias sem st"), Some(TaxRegime::AnexoI));
        assert_eq!(classify_regime("venda de mercadorias industrializadas"), Some(TaxRegime::AnexoII));
        assert_eq!(classify_regime("industria"), Some(TaxRegime::AnexoII));
        assert_eq!(
            classify_regime("prestacao de servicos ... sem fator r"),
            Some(TaxRegime::AnexoIII)
        );
        assert_eq!(classify_regime("servicos sujeitos ao anexo iv"), Some(TaxRegime::AnexoIV));
        assert_eq!(
            classify_regime("prestacao de servicos, exceto os tributados pelo anexo iii"),
            Some(TaxRegime::AnexoIII)
        );
        assert_eq!(classify_regime("locacao de bens moveis"), None);
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(
            classify_regime("revenda de mercadorias ... servicos do anexo iv"),
            Some(TaxRegime::AnexoI)
        );
        assert_eq!(
            classify_regime("industria; prestacao de servicos sem fator r"),
            Some(TaxRegime::AnexoII)
        );
    }

    #[test]
    fn test_in_order_condition() {
        let rule = Condition::InOrder(&["prestacao de servicos", "tributados pelo anexo iii"]);
        assert!(rule.matches("prestacao de servicos x tributados pelo anexo iii"));
        assert!(!rule.matches("tributados pelo anexo iii x prestacao de servicos"));
    }

    #[test]
    fn test_classify_document_requires_anchor() {
        let text = "Revenda de mercadorias, exceto para o exterior";
        assert_eq!(classify_document(text), None);

        let text = "Valor do Débito por Tributo para a Atividade (R$):\n\
                    Prestação de Serviços, exceto para o exterior - Sem fator r";
        assert_eq!(classify_document(text), Some(TaxRegime::AnexoIII));
    }

    #[test]
    fn test_classify_document_window_limit() {
        let filler = "x".repeat(REGIME_WINDOW_CHARS);
        let text = format!(
            "Valor do Débito por Tributo para a Atividade\n{}\nRevenda de mercadorias",
            filler
        );
        assert_eq!(classify_document(&text), None);
    }
}
