use std::collections::BTreeMap;
use std::fmt::Write;

/// Render the phrase-decomposition prompt. Learned corrections go in a
/// priority block ahead of the general rules so the model prefers them when
/// both would apply to the same word.
pub(crate) fn phrase_prompt(phrase: &str, corrections: &BTreeMap<String, String>) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Eres un experto en SAAC. Traduce la frase coloquial a conceptos visuales simples para ARASAAC."
    );
    let _ = writeln!(prompt, "FRASE: \"{phrase}\"");

    if !corrections.is_empty() {
        let _ = writeln!(
            prompt,
            "REGLAS PRIORITARIAS (correcciones aprendidas, ganan sobre las reglas generales):"
        );
        for (original, resolved) in corrections {
            let _ = writeln!(prompt, "- \"{original}\" -> buscar \"{resolved}\"");
        }
    }

    let _ = writeln!(prompt, "REGLAS GENERALES:");
    let _ = writeln!(prompt, "1. Simplifica gramática. Verbos en INFINITIVO.");
    let _ = writeln!(
        prompt,
        "2. CONTEXTO ARGENTINO: \"Jardín\"->buscar \"escuela\". \"Seño\"->buscar \"profesora\". \"Rico\"->buscar \"gustar\"."
    );
    let _ = writeln!(prompt, "3. Elimina artículos/preposiciones inútiles.");
    let _ = writeln!(
        prompt,
        "SALIDA JSON: [ {{\"original\": \"palabra\", \"busqueda_arasaac\": \"termino\"}} ]"
    );

    prompt
}

/// Render the single-term correction prompt.
pub(crate) fn single_term_prompt(original: &str, clarification: &str) -> String {
    format!(
        "El usuario quiere cambiar un pictograma incorrecto.\n\
         Palabra original: \"{original}\"\n\
         Aclaración del usuario: \"{clarification}\"\n\
         Tu tarea: basado en la aclaración, dame UN ÚNICO término de búsqueda para ARASAAC.\n\
         Ejemplo: si original es \"papá\" y aclaración es \"padre de familia\", tu respuesta es: \"padre\".\n\
         Ejemplo: si original es \"banco\" y aclaración es \"para sentarse\", tu respuesta es: \"banco parque\".\n\
         Responde SOLAMENTE un JSON: {{ \"busqueda_arasaac\": \"termino\" }}\n"
    )
}
