//! Builds the single natural-language instruction sent to the drafting
//! backend. The prompt is composed as an ordered list of sections, with the
//! second-defendant material present only when a second contestation was
//! supplied, and the list joined at the end.

use crate::drafter::DraftRequest;

/// Substituted for an empty focus instruction.
pub const DEFAULT_FOCUS: &str = "Abordar todos os pontos controversos";

/// The four output section headers the model must reproduce verbatim, in
/// order.
pub const OUTPUT_HEADERS: [&str; 4] = [
    "# RELATÓRIO SINTÉTICO DAS TESES DE DEFESA",
    "# DAS PRELIMINARES",
    "# DO MÉRITO",
    "# DA REITERAÇÃO DOS PEDIDOS",
];

const ROLE: &str = "Atue como um Jurista Sênior Especialista em Processo Civil e Ações \
     Coletivas (Ação Civil Pública).";

const GOAL: &str =
    "Seu objetivo é redigir uma minuta de **Impugnação à(s) Contestação(ões)** (Réplica).";

const STYLE_INSTRUCTION: &str = "1. **Análise de Estilo:** Analise a \"Petição Inicial\" fornecida para capturar \
     o tom, o vocabulário e a fundamentação jurídica original. A Impugnação deve \
     parecer ter sido escrita pelo mesmo autor da Inicial.";

const MERITS_INSTRUCTION: &str = "2. **Análise de Mérito:** Identifique as teses preliminares e de mérito \
     levantadas na(s) \"Contestação(ões)\".";

/// Appended to the merits instruction only when two defendants exist.
const DUAL_DEFENDANT_INSTRUCTION: &str = "Existem dois réus; identifique claramente quais teses pertencem a qual réu, \
     agrupando-as quando forem comuns.";

const REBUTTAL_INSTRUCTION: &str = "3. **Refutação:** Para cada ponto da defesa, apresente um contra-argumento \
     robusto baseado nos fatos e direitos já expostos na Inicial, além de \
     jurisprudência consolidada (STJ/STF) se aplicável ao tema geral.";

pub fn build_instruction(request: &DraftRequest) -> String {
    let two_defendants = request.has_second_defendant();

    let focus = request.focus_area.trim();
    let focus = if focus.is_empty() { DEFAULT_FOCUS } else { focus };

    let merits = if two_defendants {
        format!("{MERITS_INSTRUCTION} {DUAL_DEFENDANT_INSTRUCTION}")
    } else {
        MERITS_INSTRUCTION.to_string()
    };

    let who_pleaded = if two_defendants { "cada réu" } else { "o réu" };

    let mut sections: Vec<String> = vec![
        ROLE.into(),
        GOAL.into(),
        "Siga estritamente estas instruções:".into(),
        STYLE_INSTRUCTION.into(),
        merits,
        REBUTTAL_INSTRUCTION.into(),
        format!(
            "4. **Foco:** Dê atenção especial à seguinte instrução do usuário: \"{focus}\"."
        ),
        "**Estrutura da Resposta Desejada (em Markdown):**".into(),
        format!(
            "{}\n(Breve resumo do que {who_pleaded} alegou)",
            OUTPUT_HEADERS[0]
        ),
        format!(
            "{}\n(Se houver, refute as preliminares processuais levantadas nas peças defensivas)",
            OUTPUT_HEADERS[1]
        ),
        format!(
            "{}\n(Refutação ponto a ponto. Use subtítulos para cada tese derrubada)",
            OUTPUT_HEADERS[2]
        ),
        format!(
            "{}\n(Conclusão reforçando a procedência da ação)",
            OUTPUT_HEADERS[3]
        ),
        "---".into(),
        "Abaixo estão os textos base:".into(),
        format!(
            "=== PETIÇÃO INICIAL (Texto Base) ===\n{}",
            request.initial_petition
        ),
        format!("=== CONTESTAÇÃO 1 (Réu 1) ===\n{}", request.contestation1),
    ];

    if two_defendants {
        sections.push(format!(
            "=== CONTESTAÇÃO 2 (Réu 2) ===\n{}",
            request.contestation2
        ));
    }

    sections.join("\n\n")
}
