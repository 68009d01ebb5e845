// src/models/crm.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusCliente {
    Ativo,
    Inativo,
    #[default]
    Prospecto,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipoVisita {
    #[default]
    Presencial,
    Online,
    Telefone,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusVisita {
    #[default]
    Agendada,
    Realizada,
    Cancelada,
}

// --- CLIENTE ---

// Os campos de texto têm `default` porque dados antigos salvos podem não tê-los.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    #[schema(example = "0b7c6f0e-3f4e-4a59-9a57-3c2f1c9d7e11")]
    pub id: String,

    #[serde(default)]
    #[schema(example = "Ana Souza")]
    pub nome: String,
    #[serde(default)]
    #[schema(example = "Mercado Central")]
    pub empresa: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Rua das Flores, 123")]
    pub endereco: String,
    #[serde(default)]
    #[schema(example = "São Paulo")]
    pub cidade: String,
    #[serde(default)]
    #[schema(example = "SP")]
    pub estado: String,
    #[serde(default)]
    pub segmento: String,

    pub status: StatusCliente,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,

    pub criado_em: DateTime<Utc>,
}

impl Cliente {
    /// "endereco, cidade", ou None se algum dos dois estiver vazio.
    pub fn endereco_completo(&self) -> Option<String> {
        let endereco = self.endereco.trim();
        let cidade = self.cidade.trim();
        if endereco.is_empty() || cidade.is_empty() {
            return None;
        }
        Some(format!("{endereco}, {cidade}"))
    }
}

// Dados para criar um cliente (id e criadoEm são gerados pelo repositório)
#[derive(Debug, Clone, Default)]
pub struct NovoCliente {
    pub nome: String,
    pub empresa: String,
    pub telefone: String,
    pub email: String,
    pub endereco: String,
    pub cidade: String,
    pub estado: String,
    pub segmento: String,
    pub status: StatusCliente,
    pub observacoes: Option<String>,
}

// Atualização parcial: `None` mantém o valor atual.
// Em `observacoes`, `Some(None)` apaga o campo.
#[derive(Debug, Clone, Default)]
pub struct AtualizacaoCliente {
    pub nome: Option<String>,
    pub empresa: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub segmento: Option<String>,
    pub status: Option<StatusCliente>,
    pub observacoes: Option<Option<String>>,
}

impl AtualizacaoCliente {
    pub fn aplicar(self, cliente: &mut Cliente) {
        let campos = [
            (self.nome, &mut cliente.nome),
            (self.empresa, &mut cliente.empresa),
            (self.telefone, &mut cliente.telefone),
            (self.email, &mut cliente.email),
            (self.endereco, &mut cliente.endereco),
            (self.cidade, &mut cliente.cidade),
            (self.estado, &mut cliente.estado),
            (self.segmento, &mut cliente.segmento),
        ];
        for (novo, atual) in campos {
            if let Some(valor) = novo {
                *atual = valor;
            }
        }
        if let Some(status) = self.status {
            cliente.status = status;
        }
        if let Some(observacoes) = self.observacoes {
            cliente.observacoes = observacoes;
        }
    }
}

// --- VISITA ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visita {
    pub id: String,
    pub cliente_id: String,

    // Cópia do nome do cliente no momento em que a visita foi criada/editada
    #[serde(default)]
    pub cliente_nome: String,

    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub data: NaiveDate,

    #[schema(example = "14:30")]
    pub horario: String,

    pub tipo: TipoVisita,
    pub status: StatusVisita,

    #[serde(default)]
    #[schema(example = "Apresentar nova linha de produtos")]
    pub objetivo: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxima_acao: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, example = 1500.0)]
    pub valor_negociado: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venda_realizada: Option<bool>,

    pub criada_em: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NovaVisita {
    pub cliente_id: String,
    pub data: NaiveDate,
    pub horario: String,
    pub tipo: TipoVisita,
    pub status: StatusVisita,
    pub objetivo: String,
    pub resultado: Option<String>,
    pub proxima_acao: Option<String>,
    pub valor_negociado: Option<Decimal>,
    pub venda_realizada: Option<bool>,
}

// Mesma convenção de AtualizacaoCliente: `Some(None)` limpa os campos opcionais.
#[derive(Debug, Clone, Default)]
pub struct AtualizacaoVisita {
    pub cliente_id: Option<String>,
    pub data: Option<NaiveDate>,
    pub horario: Option<String>,
    pub tipo: Option<TipoVisita>,
    pub status: Option<StatusVisita>,
    pub objetivo: Option<String>,
    pub resultado: Option<Option<String>>,
    pub proxima_acao: Option<Option<String>>,
    pub valor_negociado: Option<Option<Decimal>>,
    pub venda_realizada: Option<Option<bool>>,
}

impl AtualizacaoVisita {
    // clienteId/clienteNome são tratados pelo repositório, que conhece os clientes
    pub fn aplicar(self, visita: &mut Visita) {
        if let Some(data) = self.data {
            visita.data = data;
        }
        if let Some(horario) = self.horario {
            visita.horario = horario;
        }
        if let Some(tipo) = self.tipo {
            visita.tipo = tipo;
        }
        if let Some(status) = self.status {
            visita.status = status;
        }
        if let Some(objetivo) = self.objetivo {
            visita.objetivo = objetivo;
        }
        if let Some(resultado) = self.resultado {
            visita.resultado = resultado;
        }
        if let Some(proxima_acao) = self.proxima_acao {
            visita.proxima_acao = proxima_acao;
        }
        if let Some(valor) = self.valor_negociado {
            visita.valor_negociado = valor;
        }
        if let Some(venda) = self.venda_realizada {
            visita.venda_realizada = venda;
        }
    }
}
