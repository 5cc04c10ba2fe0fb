const FORMAL_STYLE_GUIDANCE: &str =
    "Mantenha a formalidade própria de textos legislativos e administrativos.";

const TRANSCRIPTION_STYLE_GUIDANCE: &str = "Este texto é a transcrição de um discurso: \
preserve ao máximo a originalidade da fala. Mantenha hesitações comuns (como 'ééé', 'ããã'), \
marcadores conversacionais (como 'né?', 'tá?', 'então') e o vocabulário do orador, corrigindo \
apenas erros gramaticais e ortográficos claros que prejudiquem a compreensão. Não converta a \
linguagem falada em escrita excessivamente formal.";

/// Build the reviewer instructions sent along with the text
pub fn build_revision_prompt(text: &str, is_transcription: bool) -> String {
    let style_guidance = if is_transcription {
        TRANSCRIPTION_STYLE_GUIDANCE
    } else {
        FORMAL_STYLE_GUIDANCE
    };

    format!(
        "Você é um revisor de textos meticuloso, especialista em português do Brasil e em documentos \
legislativos de câmaras municipais, prefeituras e assembleias legislativas.
Revise o texto abaixo de forma completa, atento a todos os detalhes.

**Critérios obrigatórios:**

1. **Gramática e ortografia (norma culta):**
    * Corrija ortografia (Novo Acordo Ortográfico), pontuação, crase e acentuação.
    * Ajuste a concordância verbal e nominal.
    * Corrija a regência verbal e nominal e a colocação pronominal conforme o uso formal em textos legais.

2. **Estilo (intervenção mínima no conteúdo):**
    * Melhore a fluidez e a clareza sem alterar o significado nem a intenção do autor.
    * {style_guidance}
    * Não reestruture frases, a menos que seja indispensável para a correção gramatical.
    * Não acrescente nem remova informações.

3. **Formatação:**
    * Preserve fielmente os parágrafos e as quebras de linha ('\\n') do original.
    * Não junte nem separe parágrafos, salvo erro evidente.

**Formato da resposta:**
Retorne APENAS o texto revisado, sem comentários, introduções ou observações.

**Texto original para revisão:**
---
{text}
---
"
    )
}
