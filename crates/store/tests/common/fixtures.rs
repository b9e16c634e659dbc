//! Test fixtures for command data.

use comandos_core::CommandInput;

/// A fully populated command input.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub fn full_input(topico: &str, nome: &str) -> CommandInput {
    CommandInput {
        topico: topico.to_string(),
        nome: Some(nome.to_string()),
        categoria: Some("basico".to_string()),
        definicao: Some(format!("definicao de {nome}")),
        comando_exemplo: Some(format!("{topico} {nome}")),
        explicacao_pratica: Some("explicacao".to_string()),
        dicas_de_uso: Some("dica".to_string()),
    }
}

/// A small mixed-topic data set.
#[allow(dead_code)]
pub fn sample_inputs() -> Vec<CommandInput> {
    vec![
        full_input("git", "status"),
        full_input("linux", "ls"),
        full_input("PowerShell", "Get-ChildItem"),
        full_input("git", "add"),
        CommandInput::new("shell").with_nome("echo"),
        CommandInput::new("docker"),
    ]
}
