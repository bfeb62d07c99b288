//! Built-in missions and resources

use crate::types::{Difficulty, Pillar, PillarImpact, Resource, Rewards, VillageMission};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn impact(pillar: Pillar, value: u32) -> PillarImpact {
    PillarImpact { pillar, value }
}

#[allow(clippy::too_many_arguments)]
fn mission(
    id: &str,
    title: &str,
    place_id: &str,
    description: &str,
    roles: &[&str],
    difficulty: Difficulty,
    duration: &str,
    points: u32,
    steps: &[&str],
    pillars_impact: Vec<PillarImpact>,
    rewards: (&str, &[&str]),
) -> VillageMission {
    VillageMission {
        id: id.to_string(),
        title: title.to_string(),
        place_id: place_id.to_string(),
        description: description.to_string(),
        roles_requis: strings(roles),
        difficulty,
        duration: duration.to_string(),
        points: Some(points),
        steps: strings(steps),
        pillars_impact,
        rewards: Rewards {
            badge: rewards.0.to_string(),
            unlocks_next: strings(rewards.1),
        },
    }
}

/// The village's missions, in display order
#[must_use]
pub fn builtin_missions() -> Vec<VillageMission> {
    vec![
        mission(
            "mission-cloud-libre",
            "Migrer vers le cloud libre",
            "ecole",
            "Remplacer Google Drive par Nextcloud pour retrouver la souveraineté sur nos données.",
            &["enseignant", "technicien", "direction"],
            Difficulty::Medium,
            "30 min",
            150,
            &[
                "Installer Nextcloud sur un serveur local",
                "Migrer les documents existants",
                "Former les enseignants à l'utilisation",
                "Configurer les permissions et partages",
            ],
            vec![
                impact(Pillar::Responsabilite, 20),
                impact(Pillar::Durabilite, 10),
            ],
            ("Maître du Cloud Libre", &["mission-formats-ouverts"]),
        ),
        mission(
            "mission-linux-revival",
            "Renaissance Linux",
            "salle-info",
            "Redonner vie à 10 ordinateurs obsolètes en installant une distribution Linux légère.",
            &["technicien", "enseignant"],
            Difficulty::Easy,
            "45 min",
            120,
            &[
                "Évaluer le matériel disponible",
                "Choisir la distribution (Emmabuntüs, Xubuntu...)",
                "Créer une clé USB bootable",
                "Installer et configurer les postes",
            ],
            vec![impact(Pillar::Durabilite, 25), impact(Pillar::Inclusion, 15)],
            ("Sauveur de Machines", &[]),
        ),
        mission(
            "mission-cantine-libre",
            "Cantine sans frais cachés",
            "cantine",
            "Déployer une solution open-source de gestion de cantine.",
            &["direction", "parent", "collectivite"],
            Difficulty::Medium,
            "40 min",
            130,
            &[
                "Analyser les besoins fonctionnels",
                "Comparer les solutions open-source disponibles",
                "Mettre en place un pilote sur 1 mois",
                "Former le personnel de cantine",
            ],
            vec![
                impact(Pillar::Responsabilite, 15),
                impact(Pillar::Inclusion, 20),
            ],
            ("Champion de l'Inclusion", &[]),
        ),
        mission(
            "mission-datacenter-mutualise",
            "Data Center Collectif",
            "data-center",
            "Créer un data center mutualisé entre 5 établissements avec énergie renouvelable.",
            &["technicien", "collectivite", "direction"],
            Difficulty::Hard,
            "60 min",
            200,
            &[
                "Réunir les établissements partenaires",
                "Choisir un hébergeur local et éthique",
                "Calculer les économies d'échelle",
                "Signer une convention de mutualisation",
            ],
            vec![
                impact(Pillar::Durabilite, 30),
                impact(Pillar::Responsabilite, 20),
                impact(Pillar::Inclusion, 10),
            ],
            ("Architecte du Futur", &[]),
        ),
    ]
}

fn resource(
    id: &str,
    title: &str,
    description: &str,
    url: &str,
    category: &str,
    pillar: Pillar,
) -> Resource {
    Resource {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        category: category.to_string(),
        pillar,
    }
}

/// Reference resources for players
#[must_use]
pub fn builtin_resources() -> Vec<Resource> {
    vec![
        resource(
            "nird-officiel",
            "Site officiel NIRD",
            "La référence sur le Numérique Inclusif, Responsable et Durable",
            "https://www.nird.fr",
            "general",
            Pillar::Responsabilite,
        ),
        resource(
            "framasoft",
            "Framasoft",
            "Association promouvant le logiciel libre et les services éthiques",
            "https://framasoft.org",
            "logiciels-libres",
            Pillar::Responsabilite,
        ),
        resource(
            "emmabuntus",
            "Emmabuntüs",
            "Distribution Linux pour redonner vie aux vieux ordinateurs",
            "https://emmabuntus.org",
            "systemes",
            Pillar::Durabilite,
        ),
        resource(
            "asso-hopen",
            "HOP - Halte à l'Obsolescence",
            "Lutter contre l'obsolescence programmée",
            "https://www.halteobsolescence.org",
            "durabilite",
            Pillar::Durabilite,
        ),
        resource(
            "april",
            "April",
            "Association de promotion et défense du logiciel libre",
            "https://www.april.org",
            "logiciels-libres",
            Pillar::Responsabilite,
        ),
        resource(
            "asso-chatons",
            "CHATONS",
            "Collectif d'hébergeurs alternatifs transparents et solidaires",
            "https://chatons.org",
            "hebergement",
            Pillar::Responsabilite,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mission_ids_are_unique() {
        let missions = builtin_missions();
        let ids: HashSet<_> = missions.iter().map(|m| m.id.as_str()).collect();

        assert_eq!(missions.len(), 4);
        assert_eq!(ids.len(), missions.len());
    }

    #[test]
    fn resources_are_listed() {
        assert_eq!(builtin_resources().len(), 6);
    }
}
