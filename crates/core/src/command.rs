//! Command records.

use serde::{Deserialize, Serialize};

/// A stored command entry.
///
/// `id` is assigned by the store and never changes. Optional fields are kept
/// verbatim and serialize as explicit `null` when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: i32,
    pub topico: String,
    pub nome: Option<String>,
    pub categoria: Option<String>,
    pub definicao: Option<String>,
    pub comando_exemplo: Option<String>,
    pub explicacao_pratica: Option<String>,
    pub dicas_de_uso: Option<String>,
}

impl Command {
    /// Build a command from its assigned id and the writable fields.
    pub fn from_input(id: i32, input: CommandInput) -> Self {
        Self {
            id,
            topico: input.topico,
            nome: input.nome,
            categoria: input.categoria,
            definicao: input.definicao,
            comando_exemplo: input.comando_exemplo,
            explicacao_pratica: input.explicacao_pratica,
            dicas_de_uso: input.dicas_de_uso,
        }
    }

    /// The writable fields of this command.
    pub fn to_input(&self) -> CommandInput {
        CommandInput {
            topico: self.topico.clone(),
            nome: self.nome.clone(),
            categoria: self.categoria.clone(),
            definicao: self.definicao.clone(),
            comando_exemplo: self.comando_exemplo.clone(),
            explicacao_pratica: self.explicacao_pratica.clone(),
            dicas_de_uso: self.dicas_de_uso.clone(),
        }
    }

    /// Split off the topic, leaving the grouped representation.
    pub fn split_topic(self) -> (String, GroupedCommand) {
        let grouped = GroupedCommand {
            id: self.id,
            nome: self.nome,
            categoria: self.categoria,
            definicao: self.definicao,
            comando_exemplo: self.comando_exemplo,
            explicacao_pratica: self.explicacao_pratica,
            dicas_de_uso: self.dicas_de_uso,
        };
        (self.topico, grouped)
    }
}

/// Writable fields accepted by create and update.
///
/// Update is a full overwrite: every optional field left out of the request
/// body is stored as null.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInput {
    pub topico: String,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub definicao: Option<String>,
    #[serde(default)]
    pub comando_exemplo: Option<String>,
    #[serde(default)]
    pub explicacao_pratica: Option<String>,
    #[serde(default)]
    pub dicas_de_uso: Option<String>,
}

impl CommandInput {
    /// Create an input with only the required topic set.
    pub fn new(topico: impl Into<String>) -> Self {
        Self {
            topico: topico.into(),
            ..Default::default()
        }
    }

    /// Set the command name.
    pub fn with_nome(mut self, nome: impl Into<String>) -> Self {
        self.nome = Some(nome.into());
        self
    }

    /// Parse a JSON request body.
    pub fn from_json(bytes: &[u8]) -> crate::Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| crate::Error::Validation(format!("invalid command body: {e}")))
    }
}

/// A command inside a topic bucket; the topic is the bucket key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCommand {
    pub id: i32,
    pub nome: Option<String>,
    pub categoria: Option<String>,
    pub definicao: Option<String>,
    pub comando_exemplo: Option<String>,
    pub explicacao_pratica: Option<String>,
    pub dicas_de_uso: Option<String>,
}
