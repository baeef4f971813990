// src/services/delivery_service.rs

use rand::seq::SliceRandom;

use crate::{
    common::error::AppError,
    db::DeliveryRepository,
    models::delivery::{CandidateRow, LocationSignal, SponsoredCandidate, SponsoredQuery},
};

const EARTH_RADIUS_KM: f64 = 6371.0;

// Distância de círculo máximo (haversine) entre dois pontos, em km.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

// Seleção de candidatos: o repo devolve as linhas já restritas pelo predicado
// de elegibilidade; aqui entram distância, corte por raio e a política de
// rotação.
#[derive(Clone)]
pub struct DeliveryService {
    repo: DeliveryRepository,
}

impl DeliveryService {
    pub fn new(repo: DeliveryRepository) -> Self {
        Self { repo }
    }

    pub async fn select_candidates(
        &self,
        query: &SponsoredQuery,
    ) -> Result<Vec<SponsoredCandidate>, AppError> {
        let Some(signal) = query.signal() else {
            // Sem sinal de localização não há contra o que mirar.
            tracing::debug!("Busca de patrocinados sem sinal de localização");
            return Ok(Vec::new());
        };

        let rows = self
            .repo
            .fetch_candidates(&signal, query.category.as_deref())
            .await?;

        Ok(rank_candidates(rows, &signal))
    }
}

// Ranking:
//  - coordenadas: distância ascendente; quem estiver além do raio (ou sem
//    geolocalização) cai fora. Empates ficam em ordem aleatória, porque o
//    shuffle roda antes do sort estável.
//  - sinal textual: shuffle uniforme por requisição. Rotação aleatória foi a
//    política de justiça escolhida — não precisa de estado entre requisições
//    e não deixa campanhas recém-criadas morrerem de fome no fim da lista.
pub fn rank_candidates(
    mut rows: Vec<CandidateRow>,
    signal: &LocationSignal,
) -> Vec<SponsoredCandidate> {
    rows.shuffle(&mut rand::thread_rng());

    match *signal {
        LocationSignal::Coordinates { lat, lng, radius_km } => {
            let mut ranked: Vec<SponsoredCandidate> = rows
                .into_iter()
                .filter_map(|row| {
                    let (p_lat, p_lng) = (row.latitude?, row.longitude?);
                    let distance = haversine_km(lat, lng, p_lat, p_lng);
                    if distance > radius_km {
                        return None;
                    }
                    let (campaign_id, property) = row.into_property();
                    Some(SponsoredCandidate {
                        campaign_id,
                        distance_km: Some(distance),
                        property,
                    })
                })
                .collect();

            ranked.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            ranked
        }
        _ => rows
            .into_iter()
            .map(|row| {
                let (campaign_id, property) = row.into_property();
                SponsoredCandidate {
                    campaign_id,
                    distance_km: None,
                    property,
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(lat: Option<f64>, lng: Option<f64>) -> CandidateRow {
        CandidateRow {
            campaign_id: Uuid::new_v4(),
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Imóvel".into(),
            images: vec![],
            price: None,
            price_type: None,
            property_type: None,
            city: "Bengaluru".into(),
            area: "Indiranagar".into(),
            pin_code: Some("560001".into()),
            latitude: lat,
            longitude: lng,
            verified: false,
        }
    }

    #[test]
    fn haversine_of_same_point_is_zero() {
        assert!(haversine_km(12.9, 77.6, 12.9, 77.6).abs() < 1e-9);
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Bengaluru → Chennai: ~290 km em linha reta
        let d = haversine_km(12.9716, 77.5946, 13.0827, 80.2707);
        assert!((280.0..300.0).contains(&d), "distância fora do esperado: {d}");
    }

    #[test]
    fn within_radius_is_included_and_ranked_before_farther() {
        // Origem (12.90, 77.60), raio 10 km: candidato a ~5.5 km entra e vem
        // antes; candidato a ~15 km fica de fora.
        let origin = LocationSignal::Coordinates {
            lat: 12.90,
            lng: 77.60,
            radius_km: 10.0,
        };
        let near = row(Some(12.95), Some(77.60)); // ~5.5 km ao norte
        let nearer = row(Some(12.92), Some(77.60)); // ~2.2 km ao norte
        let far = row(Some(13.035), Some(77.60)); // ~15 km ao norte
        let near_id = near.campaign_id;
        let nearer_id = nearer.campaign_id;

        let ranked = rank_candidates(vec![near, far, nearer], &origin);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].campaign_id, nearer_id);
        assert_eq!(ranked[1].campaign_id, near_id);
        assert!(ranked[0].distance_km.unwrap() < ranked[1].distance_km.unwrap());
        assert!(ranked.iter().all(|c| c.distance_km.unwrap() <= 10.0));
    }

    #[test]
    fn candidates_without_coordinates_are_dropped_in_geo_mode() {
        let origin = LocationSignal::Coordinates {
            lat: 12.90,
            lng: 77.60,
            radius_km: 10.0,
        };
        let ranked = rank_candidates(vec![row(None, None)], &origin);
        assert!(ranked.is_empty());
    }

    #[test]
    fn textual_signal_keeps_everyone_with_null_distance() {
        let ranked = rank_candidates(
            vec![row(None, None), row(Some(12.9), Some(77.6))],
            &LocationSignal::City("Bengaluru".into()),
        );
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|c| c.distance_km.is_none()));
    }
}
