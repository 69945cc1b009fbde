//! Test fixtures: synthetic photos and form payloads.

use bytes::Bytes;
use fleet_core::{EvidenceKind, EvidencePayload, MaintenanceOrderRecord, RawImage, TripEndRecord};
use serde_json::{json, Map};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture image");
    Bytes::from(buffer)
}

/// Camera-style JPEG of the given size.
pub fn camera_photo(width: u32, height: u32) -> RawImage {
    RawImage::new("IMG_0042.JPG", "image/jpeg", encode(width, height, ImageFormat::Jpeg))
}

/// Screenshot-style PNG of the given size.
pub fn screenshot(width: u32, height: u32) -> RawImage {
    RawImage::new("comprovante.png", "image/png", encode(width, height, ImageFormat::Png))
}

/// A file that is not an image at all.
pub fn not_an_image() -> RawImage {
    RawImage::new(
        "relatorio.pdf",
        "application/pdf",
        Bytes::from_static(b"%PDF-1.4 not really an image"),
    )
}

/// Refueling form as the frontend sends it, including a field the record type
/// does not model.
pub fn refueling() -> EvidencePayload {
    EvidencePayload::from_json(
        EvidenceKind::Refueling,
        json!({
            "veiculoId": 12,
            "fornecedorId": 4,
            "litros": 45.3,
            "valorTotal": 289.9,
            "kmAtual": 48210.0,
            "dataHora": "2024-05-30T10:15:00Z",
            "tipoCombustivel": "DIESEL"
        }),
    )
    .unwrap()
}

pub fn maintenance_order() -> EvidencePayload {
    EvidencePayload::MaintenanceOrder(MaintenanceOrderRecord {
        veiculo_id: 12,
        fornecedor_id: 9,
        descricao: "Troca de pastilhas de freio".to_string(),
        valor_total: 640.0,
        km_atual: Some(48300.0),
        foto_comprovante_url: None,
        extra: Map::new(),
    })
}

pub fn trip_end() -> EvidencePayload {
    EvidencePayload::TripEnd(TripEndRecord {
        km_fim: 48390.0,
        observacoes: None,
        ghost_journey: false,
        foto_fim_url: None,
        extra: Map::new(),
    })
}
