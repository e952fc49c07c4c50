//! Instruction text sent to the completion model.
//!
//! Both builders are plain string assembly: identical inputs give identical
//! output, and nothing here touches the network.

use std::fmt::Display;

use crate::models::{PerformanceProfile, SetupType, TuningConfiguration, Vehicle};

const UNKNOWN: &str = "Bilinmiyor";
const JSON_ONLY: &str = "Sadece JSON döndür, başka bir açıklama ekleme.";

/// Instruction for a fresh tuning sheet.
pub fn build_generation_prompt(
    vehicle: &Vehicle,
    prompt: &str,
    setup_type: Option<SetupType>,
) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(
        "Bu bir Forza Horizon 5 araç tuning talebidir. Lütfen aşağıdaki araç için \
         kullanıcının isteğine göre bir tuning ayarı oluştur.\n\n",
    );
    push_vehicle(&mut out, vehicle);

    out.push('\n');
    line(&mut out, "Kullanıcı İsteği", prompt.trim());
    if let Some(setup_type) = setup_type {
        line(&mut out, "Setup Tipi", setup_type.label());
    }

    out.push('\n');
    push_schema(
        &mut out,
        &vehicle.performance,
        "Tuning'in neden bu şekilde yapıldığına dair açıklama",
    );
    push_guidance(&mut out);
    out.push_str(JSON_ONLY);
    out.push('\n');
    out
}

/// Instruction for refining `current` according to free-text feedback.
pub fn build_adjustment_prompt(
    vehicle: &Vehicle,
    current: &TuningConfiguration,
    feedback: &str,
) -> Result<String, serde_json::Error> {
    let current_json = serde_json::to_string_pretty(current)?;
    let mut out = String::with_capacity(4096 + current_json.len());

    out.push_str(
        "Bu bir Forza Horizon 5 araç tuning düzeltme talebidir. Kullanıcı aşağıdaki \
         mevcut tuning ayarlarının geri bildirimine göre güncellenmesini istiyor.\n\n",
    );
    push_vehicle(&mut out, vehicle);

    out.push_str("\nMevcut Tuning Ayarları:\n");
    out.push_str(&current_json);
    out.push_str("\n\n");
    line(&mut out, "Kullanıcı Geri Bildirimi", feedback.trim());

    out.push('\n');
    push_schema(
        &mut out,
        &vehicle.performance,
        "Yapılan değişikliklerin neden yapıldığına dair açıklama",
    );
    out.push_str(
        "Kullanıcının geri bildirimine göre yalnızca değişmesi gereken parametreleri değiştir; \
         diğer tüm parametreleri mevcut tuningdeki değerlerle birebir aynı bırak.\n",
    );
    out.push_str("Mevcut tuningde olmayan opsiyonel parametreler için değer belirtmene gerek yok.\n\n");
    push_guidance(&mut out);
    out.push_str(JSON_ONLY);
    out.push('\n');
    Ok(out)
}

fn line(out: &mut String, label: &str, value: impl Display) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(&value.to_string());
    out.push('\n');
}

fn or_unknown<T: Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => v.to_string(),
        Some(v) => format!("{v} {unit}"),
        None => UNKNOWN.to_string(),
    }
}

fn push_vehicle(out: &mut String, vehicle: &Vehicle) {
    let p = &vehicle.performance;

    out.push_str("Araç Bilgileri:\n");
    line(out, "Marka", &vehicle.brand);
    line(out, "Model", &vehicle.model);
    line(out, "Yıl", vehicle.year);
    line(out, "Beygir Gücü", format!("{} hp", p.power));
    line(out, "Tork", format!("{} N-m", p.torque));
    line(out, "Ağırlık", format!("{} kg", p.weight));
    line(out, "Ön Ağırlık Dağılımı", format!("{}%", p.front_weight));
    line(out, "Arka Ağırlık Dağılımı", format!("{}%", p.rear_weight()));
    line(out, "Motor Hacmi", format!("{} cc", p.displacement));
    line(out, "Çekiş Sistemi", p.drivetrain);
    line(out, "Motor Konumu", or_unknown(p.engine_position.map(|e| e.as_str()), ""));
    line(out, "Besleme Tipi", or_unknown(p.aspiration.map(|a| a.as_str()), ""));
    line(out, "Silindir Sayısı", or_unknown(p.cylinders, ""));
    line(out, "Stok Azami Hız", or_unknown(p.stock_top_speed, "km/h"));
    line(out, "Stok 0-100 km/h Süresi", or_unknown(p.stock_acceleration, "sn"));
    line(out, "Kategori", &p.category);
    line(out, "Performans İndeksi", p.performance_index);
}

fn push_schema(out: &mut String, performance: &PerformanceProfile, explanation_hint: &str) {
    let drivetrain = performance.drivetrain;
    let turbo_note = if performance.aspiration.is_some_and(|a| a.is_turbocharged()) {
        "mevcut besleme türü Turbo/Twin-turbo"
    } else {
        "NA/Supercharged besleme"
    };

    out.push_str("Lütfen şu formatta bir JSON yanıtı oluştur:\n");
    out.push_str(
        r#"{
  "tires": {
    "frontPressure": x.x,
    "rearPressure": x.x,
    "frontWidth": xxx (opsiyonel, mm cinsinden),
    "rearWidth": xxx (opsiyonel, mm cinsinden),
    "frontProfile": xx (opsiyonel, % cinsinden),
    "rearProfile": xx (opsiyonel, % cinsinden),
    "frontRimSize": xx (opsiyonel, inç cinsinden),
    "rearRimSize": xx (opsiyonel, inç cinsinden),
    "compound": "lastik tipi" (opsiyonel, Stock, Street, Sport, Race, Drag, Rally, Drift, Offroad)
  },
  "gearing": {
    "finalDrive": x.xx,
    "firstGear": x.xx,
    "secondGear": x.xx,
    "thirdGear": x.xx,
    "fourthGear": x.xx,
    "fifthGear": x.xx,
    "sixthGear": x.xx (opsiyonel),
    "seventhGear": x.xx (opsiyonel),
    "eighthGear": x.xx (opsiyonel),
    "ninthGear": x.xx (opsiyonel),
    "tenthGear": x.xx (opsiyonel),
    "gearCount": x (opsiyonel, en fazla 10),
    "topSpeed": xxx (opsiyonel, km/h cinsinden)
  },
  "alignment": {
    "frontCamber": x.x,
    "rearCamber": x.x,
    "frontToe": x.x,
    "rearToe": x.x,
    "frontCaster": x.x
  },
  "antirollBars": {
    "front": xx.x,
    "rear": xx.x
  },
  "springs": {
    "frontStiffness": xx.x,
    "rearStiffness": xx.x,
    "frontHeight": xx.x,
    "rearHeight": xx.x,
    "springType": "yay tipi" (opsiyonel, Stock, Race, Rally, Drift, Offroad)
  },
  "damping": {
    "frontReboundStiffness": xx.x,
    "rearReboundStiffness": xx.x,
    "frontBumpStiffness": xx.x,
    "rearBumpStiffness": xx.x
  },
  "aero": {
    "frontDownforce": xxx,
    "rearDownforce": xxx
  },
  "braking": {
    "brakeBalance": xx,
    "brakePressure": xx,
    "brakeType": "fren tipi" (opsiyonel, Stock, Street, Race, Rally, Drift)
  },
  "differential": {
"#,
    );

    if drivetrain.has_front_differential() {
        out.push_str("    \"frontAccel\": xx,\n");
        out.push_str("    \"frontDecel\": xx,\n");
    }
    out.push_str("    \"rearAccel\": xx,\n");
    out.push_str("    \"rearDecel\": xx,\n");
    if drivetrain.has_center_differential() {
        out.push_str("    \"center\": xx (ön/arka tork dağılımı, % cinsinden),\n");
    }
    out.push_str(
        "    \"diffType\": \"diferansiyel tipi\" (opsiyonel, Stock, Race, Rally, Drift, Offroad)\n",
    );
    out.push_str("  },\n");

    out.push_str("  \"engine\": {\n");
    let levels = [
        "intakeLevel",
        "exhaustLevel",
        "camshaftLevel",
        "valvesLevel",
        "engineBlockLevel",
        "pistonLevel",
        "turboLevel",
        "intercoolerLevel",
        "oilLevel",
        "flyWheelLevel",
        "ignitionLevel",
    ];
    for (i, level) in levels.iter().enumerate() {
        let separator = if i + 1 == levels.len() { "" } else { "," };
        if *level == "turboLevel" {
            out.push_str(&format!(
                "    \"{level}\": x (opsiyonel, 0-5 arası, {turbo_note}){separator}\n"
            ));
        } else {
            out.push_str(&format!("    \"{level}\": x (opsiyonel, 0-5 arası){separator}\n"));
        }
    }
    out.push_str("  },\n");
    out.push_str(&format!("  \"explanation\": \"{explanation_hint}\"\n"));
    out.push_str("}\n\n");
}

fn push_guidance(out: &mut String) {
    out.push_str("FH5'teki gerçek tuning değerlerini göz önünde bulundur:\n");
    out.push_str("- Çekiş tipine göre (FWD, RWD, AWD) uygun diferansiyel ayarları ver\n");
    out.push_str("- Ön/arka ağırlık dağılımına göre uygun yay ve antiroll bar değerleri belirle\n");
    out.push_str("- Motor konumuna göre (Ön, Orta, Arka) uygun ağırlık transferi ayarları ver\n");
    out.push_str("- Körükörüne rakamlar verme, gerçekçi ve dengeli değerler sağla\n\n");
}
